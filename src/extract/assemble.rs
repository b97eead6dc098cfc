//! Row clustering assembler.
//!
//! Text fragments from the cropped table carry only absolute pixel
//! positions, no row or column identity. The table structure is recovered
//! from two guarantees of the game UI: a "Rank" header sits above the data,
//! and every data row contains exactly one role label (Member/Leader/
//! Officer). Each role label's bottom-y becomes a row anchor; fragments are
//! clustered into the vertical band around the first anchor they match, then
//! x-sorted to recover column order.

use thiserror::Error;

use super::locate::normalized_boxes;
use super::ROLE_KEYWORDS;
use crate::ocr::TextBox;

#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("no header row")]
    NoHeaderRow,
    #[error("no row anchors")]
    NoRowAnchors,
}

/// A reconstructed table: header texts plus data rows, all in left-to-right
/// column order, rows in top-to-bottom (rank) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Clusters cropped-table fragments into a header row and ordered data rows.
///
/// Fragments outside every row band are dropped as noise. Fragments whose
/// quads fail normalization are skipped with a warning; a single malformed
/// detection never aborts the table.
pub fn assemble_table(boxes: &[TextBox], row_padding: f32) -> Result<Table, AssemblyError> {
    let valid = normalized_boxes(boxes);

    // First pass: the header anchor and one row anchor per role label, in
    // discovery order.
    let mut header_y: Option<f32> = None;
    let mut anchors: Vec<f32> = Vec::new();
    for (rect, text_box) in &valid {
        let text = text_box.text.to_lowercase();
        if text == "rank" {
            if header_y.is_none() {
                header_y = Some(rect.bottom);
            }
        } else if ROLE_KEYWORDS.contains(&text.as_str()) {
            anchors.push(rect.bottom);
        }
    }
    let header_y = header_y.ok_or(AssemblyError::NoHeaderRow)?;
    if anchors.is_empty() {
        return Err(AssemblyError::NoRowAnchors);
    }

    // Second pass: assign every fragment to the header band or to the first
    // anchor band that contains its bottom edge. First match wins by anchor
    // discovery order, not by distance; row bands do not overlap within the
    // padding tolerance at normal resolutions.
    let mut header_parts: Vec<(f32, &str)> = Vec::new();
    let mut rows: Vec<Vec<(f32, &str)>> = vec![Vec::new(); anchors.len()];
    for (rect, text_box) in &valid {
        if (rect.bottom - header_y).abs() <= row_padding {
            header_parts.push((rect.left, text_box.text.as_str()));
            continue;
        }
        for (row, &anchor_y) in anchors.iter().enumerate() {
            if anchor_y - row_padding <= rect.bottom && rect.bottom <= anchor_y + row_padding {
                rows[row].push((rect.left, text_box.text.as_str()));
                break;
            }
        }
        // No band matched: out-of-table noise, dropped
    }

    // Ordering: columns left-to-right within each row, rows top-to-bottom.
    let header = sorted_texts(header_parts);
    let mut ordered: Vec<(f32, Vec<(f32, &str)>)> = anchors
        .into_iter()
        .zip(rows)
        .filter(|(_, parts)| !parts.is_empty())
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    let rows = ordered
        .into_iter()
        .map(|(_, parts)| sorted_texts(parts))
        .collect();

    Ok(Table { header, rows })
}

fn sorted_texts(mut parts: Vec<(f32, &str)>) -> Vec<String> {
    parts.sort_by(|a, b| a.0.total_cmp(&b.0));
    parts.into_iter().map(|(_, text)| text.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_at(text: &str, left: f32, top: f32, right: f32, bottom: f32) -> TextBox {
        TextBox::new(
            [[left, top], [right, top], [right, bottom], [left, bottom]],
            text,
            0.9,
        )
    }

    /// Header at y=40 and two data rows at y=200 / y=320, fragments listed
    /// deliberately out of reading order.
    fn two_row_fixture() -> Vec<TextBox> {
        vec![
            text_at("8.88B", 400.0, 180.0, 480.0, 200.0),
            text_at("Rank", 20.0, 20.0, 80.0, 40.0),
            text_at("Total", 400.0, 20.0, 470.0, 40.0),
            text_at("Member", 300.0, 180.0, 380.0, 200.0),
            text_at("2", 20.0, 300.0, 40.0, 320.0),
            text_at("Player", 100.0, 20.0, 180.0, 40.0),
            text_at("GingerBrave", 100.0, 180.0, 280.0, 200.0),
            text_at("1", 20.0, 180.0, 40.0, 200.0),
            text_at("Leader", 300.0, 300.0, 380.0, 320.0),
            text_at("7.12B", 400.0, 300.0, 480.0, 320.0),
            text_at("Espresso", 100.0, 300.0, 280.0, 320.0),
        ]
    }

    #[test]
    fn test_assembles_header_and_rows_in_order() {
        let table = assemble_table(&two_row_fixture(), 30.0).unwrap();
        assert_eq!(table.header, vec!["Rank", "Player", "Total"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["1", "GingerBrave", "Member", "8.88B"],
                vec!["2", "Espresso", "Leader", "7.12B"],
            ]
        );
    }

    #[test]
    fn test_no_header_fails() {
        let boxes = vec![text_at("Member", 300.0, 180.0, 380.0, 200.0)];
        let err = assemble_table(&boxes, 30.0).unwrap_err();
        assert_eq!(err, AssemblyError::NoHeaderRow);
        assert_eq!(err.to_string(), "no header row");
    }

    #[test]
    fn test_no_row_anchors_fails() {
        let boxes = vec![
            text_at("Rank", 20.0, 20.0, 80.0, 40.0),
            text_at("GingerBrave", 100.0, 180.0, 280.0, 200.0),
        ];
        assert_eq!(
            assemble_table(&boxes, 30.0),
            Err(AssemblyError::NoRowAnchors)
        );
    }

    #[test]
    fn test_stray_fragment_dropped() {
        // One header, one row, plus a fragment far below any band
        let boxes = vec![
            text_at("Rank", 20.0, 20.0, 80.0, 40.0),
            text_at("Member", 300.0, 180.0, 380.0, 200.0),
            text_at("1", 20.0, 180.0, 40.0, 200.0),
            text_at("Close", 200.0, 880.0, 280.0, 900.0),
        ];
        let table = assemble_table(&boxes, 30.0).unwrap();
        assert_eq!(table.rows, vec![vec!["1", "Member"]]);
        assert!(!table.header.contains(&"Close".to_string()));
    }

    #[test]
    fn test_role_labels_must_match_exactly() {
        // "Members online" is not a row anchor; only the exact label is
        let boxes = vec![
            text_at("Rank", 20.0, 20.0, 80.0, 40.0),
            text_at("Members online", 300.0, 180.0, 380.0, 200.0),
        ];
        assert_eq!(
            assemble_table(&boxes, 30.0),
            Err(AssemblyError::NoRowAnchors)
        );
    }

    #[test]
    fn test_shuffle_invariance() {
        let boxes = two_row_fixture();
        let expected = assemble_table(&boxes, 30.0).unwrap();

        // A handful of deterministic reorderings must all agree
        let mut rotated = boxes.clone();
        for _ in 0..boxes.len() {
            rotated.rotate_left(1);
            assert_eq!(assemble_table(&rotated, 30.0).unwrap(), expected);
        }

        let mut reversed = boxes;
        reversed.reverse();
        assert_eq!(assemble_table(&reversed, 30.0).unwrap(), expected);
    }

    #[test]
    fn test_malformed_fragment_skipped() {
        let mut boxes = two_row_fixture();
        boxes.push(TextBox::new(
            [[50.0, 190.0], [50.0, 190.0], [50.0, 190.0], [50.0, 190.0]],
            "garbage",
            0.2,
        ));
        let table = assemble_table(&boxes, 30.0).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(!table.rows[0].contains(&"garbage".to_string()));
    }

    #[test]
    fn test_row_band_padding_is_inclusive() {
        let boxes = vec![
            text_at("Rank", 20.0, 20.0, 80.0, 40.0),
            text_at("Member", 300.0, 180.0, 380.0, 200.0),
            // Bottom edge exactly padding away from the anchor at 200
            text_at("edge", 100.0, 210.0, 180.0, 230.0),
        ];
        let table = assemble_table(&boxes, 30.0).unwrap();
        assert_eq!(table.rows, vec![vec!["edge", "Member"]]);
    }
}
