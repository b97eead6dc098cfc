//! Region-of-interest locator for the participant table.
//!
//! The table's position shifts with device and resolution, so the crop is
//! triangulated from text anchors instead of fixed coordinates: the
//! "Participants" header nearest the horizontal midpoint gives the top, the
//! leftmost "Player" text gives the left column boundary, and the lowest
//! role label (Member/Leader/Officer) gives the bottom and right.

use thiserror::Error;

use super::ROLE_KEYWORDS;
use crate::config::CropPadding;
use crate::geometry::Rect;
use crate::ocr::TextBox;

#[derive(Debug, Error, PartialEq)]
pub enum LocateError {
    #[error("no participant anchor")]
    NoParticipantAnchor,
    #[error("no player anchor")]
    NoPlayerAnchor,
    #[error("no role anchor")]
    NoRoleAnchor,
    #[error("degenerate crop: left={left} right={right} top={top} bottom={bottom}")]
    DegenerateCrop {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    },
}

/// Computes the crop rectangle containing the participant table.
///
/// Boxes whose quads fail geometry normalization are skipped with a warning;
/// a single malformed detection must not fail the whole location attempt.
pub fn locate_table(
    boxes: &[TextBox],
    image_width: u32,
    image_height: u32,
    padding: &CropPadding,
) -> Result<Rect, LocateError> {
    let valid = normalized_boxes(boxes);
    let center_x = image_width as f32 / 2.0;

    // "Participants" nearest the horizontal midpoint; decoy matches
    // elsewhere in the UI are typically off-center. First found wins ties.
    let mut participant: Option<(f32, &Rect)> = None;
    for (rect, text_box) in &valid {
        if !text_box.text.to_lowercase().contains("participants") {
            continue;
        }
        let x_center = quad_mean_x(text_box);
        let distance = (x_center - center_x).abs();
        if participant.is_none_or(|(best, _)| distance < best) {
            participant = Some((distance, rect));
        }
    }
    let (_, participant) = participant.ok_or(LocateError::NoParticipantAnchor)?;

    // Leftmost "player" marks the table's left column boundary
    let mut player: Option<&Rect> = None;
    for (rect, text_box) in &valid {
        if !text_box.text.to_lowercase().contains("player") {
            continue;
        }
        if player.is_none_or(|best| rect.left < best.left) {
            player = Some(rect);
        }
    }
    let player = player.ok_or(LocateError::NoPlayerAnchor)?;

    // Lowest role label marks the table's bottom; ties prefer the largest
    // right edge
    let mut role: Option<&Rect> = None;
    for (rect, text_box) in &valid {
        let text = text_box.text.to_lowercase();
        if !ROLE_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            continue;
        }
        let lower = role.is_none_or(|best| {
            rect.bottom > best.bottom || (rect.bottom == best.bottom && rect.right > best.right)
        });
        if lower {
            role = Some(rect);
        }
    }
    let role = role.ok_or(LocateError::NoRoleAnchor)?;

    let max_x = image_width as f32;
    let max_y = image_height as f32;
    let top = participant.top.clamp(0.0, max_y);
    let bottom = (role.bottom + padding.bottom).clamp(0.0, max_y);
    let left = (player.left - padding.left).clamp(0.0, max_x);
    let right = (role.right + padding.right).clamp(0.0, max_x);

    if left >= right || top >= bottom {
        return Err(LocateError::DegenerateCrop {
            left,
            right,
            top,
            bottom,
        });
    }

    Ok(Rect {
        left,
        right,
        top,
        bottom,
    })
}

/// Pairs each box with its normalized rectangle, dropping malformed quads
/// with a logged warning.
pub(super) fn normalized_boxes(boxes: &[TextBox]) -> Vec<(Rect, &TextBox)> {
    let mut valid = Vec::with_capacity(boxes.len());
    for text_box in boxes {
        match text_box.rect() {
            Ok(rect) => valid.push((rect, text_box)),
            Err(e) => crate::log(&format!(
                "Skipping malformed detection '{}': {}",
                text_box.text, e
            )),
        }
    }
    valid
}

fn quad_mean_x(text_box: &TextBox) -> f32 {
    text_box.quad.iter().map(|point| point[0]).sum::<f32>() / 4.0
}
