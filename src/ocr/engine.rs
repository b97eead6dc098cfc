use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::geometry::{GeometryError, Quad, Rect};

/// One recognized text fragment with its bounding quadrilateral.
///
/// Produced per OCR call and never mutated afterwards. Serializable so cached
/// results round-trip quad/text/confidence exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub quad: Quad,
    pub text: String,
    /// Recognition confidence in [0, 1]
    pub confidence: f32,
}

impl TextBox {
    pub fn new(quad: Quad, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// Normalizes the detection quad into an axis-aligned rectangle.
    pub fn rect(&self) -> Result<Rect, GeometryError> {
        Rect::from_quad(&self.quad)
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to invoke '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("recognizer failed: {stderr}")]
    EngineFailure { stderr: String },
    #[error("unreadable recognizer output: {message}")]
    MalformedOutput { message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Common interface for text recognizers.
///
/// The pipeline treats recognition as a pure function of the image file
/// bytes: same bytes in, same detections out. That is what makes results
/// cacheable by content hash.
pub trait OcrEngine {
    fn name(&self) -> &'static str;

    fn recognize(&self, image_path: &Path) -> Result<Vec<TextBox>, OcrError>;
}

/// Recognizer that shells out to a Tesseract executable with TSV output.
pub struct TesseractEngine {
    executable: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new(executable: PathBuf, language: impl Into<String>) -> Self {
        Self {
            executable,
            language: language.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(PathBuf::from("tesseract"), "eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image_path: &Path) -> Result<Vec<TextBox>, OcrError> {
        // Tesseract appends .tsv to the output base path
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let output = Command::new(&self.executable)
            .arg(image_path)
            .arg(&output_base)
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg("6") // Assume single uniform block of text
            .arg("tsv")
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(OcrError::EngineFailure { stderr });
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)?;
        let _ = std::fs::remove_file(&tsv_path);

        parse_tsv_output(&tsv_content)
    }
}

/// Parses Tesseract TSV output into detection boxes.
///
/// Word records carry an axis-aligned left/top/width/height box, which maps
/// onto a quad with zero skew. Confidence is rescaled from 0–100 to [0, 1].
fn parse_tsv_output(tsv: &str) -> Result<Vec<TextBox>, OcrError> {
    let mut boxes = Vec::new();

    for line in tsv.lines().skip(1) {
        // Skip header
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let level: i32 = fields[0].parse().unwrap_or(-1);
        let text = fields[11].trim();

        // Level 5 = word
        if level != 5 || text.is_empty() {
            continue;
        }

        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if conf < 0.0 {
            continue;
        }

        let parse_coord = |idx: usize| -> Result<f32, OcrError> {
            fields[idx].parse().map_err(|_| OcrError::MalformedOutput {
                message: format!("bad coordinate '{}' in: {}", fields[idx], line),
            })
        };
        let left = parse_coord(6)?;
        let top = parse_coord(7)?;
        let width = parse_coord(8)?;
        let height = parse_coord(9)?;

        let quad = [
            [left, top],
            [left + width, top],
            [left + width, top + height],
            [left, top + height],
        ];
        boxes.push(TextBox::new(quad, text, (conf / 100.0).clamp(0.0, 1.0)));
    }

    Ok(boxes)
}
