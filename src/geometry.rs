//! Bounding-box geometry for OCR detections.
//!
//! The recognizer reports each text fragment as a quadrilateral of four
//! points in reading order (top-left, top-right, bottom-right, bottom-left).
//! The rest of the pipeline works on axis-aligned rectangles, so every quad
//! goes through [`Rect::from_quad`] first. Malformed quads are rejected, not
//! coerced.

use thiserror::Error;

/// Four corner points, each `[x, y]` in pixel coordinates.
pub type Quad = [[f32; 2]; 4];

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("degenerate rectangle: x {x_min}..{x_max}, y {y_min}..{y_max}")]
    Degenerate {
        x_min: f32,
        x_max: f32,
        y_min: f32,
        y_max: f32,
    },
    #[error("non-axis-aligned: {edge} edge deviates by {deviation}px")]
    NonAxisAligned { edge: &'static str, deviation: f32 },
}

/// Axis-aligned rectangle in pixel coordinates.
///
/// Invariant: `left < right` and `top < bottom` (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    /// Normalizes a detection quad into an axis-aligned rectangle.
    ///
    /// Takes the axis extrema across the four points, then rejects quads
    /// that are degenerate (zero width or height) or so rotated that an
    /// edge's deviation reaches the rectangle's own span.
    pub fn from_quad(quad: &Quad) -> Result<Rect, GeometryError> {
        let [[x1, y1], [x2, y2], [x3, y3], [x4, y4]] = *quad;

        let x_min = x1.min(x2).min(x3).min(x4);
        let x_max = x1.max(x2).max(x3).max(x4);
        let y_min = y1.min(y2).min(y3).min(y4);
        let y_max = y1.max(y2).max(y3).max(y4);

        if x_min >= x_max || y_min >= y_max {
            return Err(GeometryError::Degenerate {
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }

        let width = x_max - x_min;
        let height = y_max - y_min;

        // Corner order is top-left, top-right, bottom-right, bottom-left:
        // horizontal edges pair (1,2) and (3,4), vertical edges (1,4) and (2,3).
        let edges = [
            ("top", (y1 - y2).abs(), height),
            ("bottom", (y3 - y4).abs(), height),
            ("left", (x1 - x4).abs(), width),
            ("right", (x2 - x3).abs(), width),
        ];
        for (edge, deviation, span) in edges {
            if deviation >= span {
                return Err(GeometryError::NonAxisAligned { edge, deviation });
            }
        }

        Ok(Rect {
            left: x_min,
            right: x_max,
            top: y_min,
            bottom: y_max,
        })
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
