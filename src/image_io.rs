//! Thin image I/O boundary: dimension probing and region cropping.
//!
//! The pipeline only ever needs the image's size and a cropped copy to feed
//! back into the recognizer; everything else stays with the OCR engine.

use anyhow::{Context, Result};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::geometry::Rect;

/// Reads the pixel dimensions of an image without decoding the full frame.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .with_context(|| format!("failed to read dimensions of {}", path.display()))
}

/// Crops a region out of an image file into a new temporary PNG.
///
/// The region is clamped to the image bounds before cropping. The returned
/// guard owns the file; it is deleted when dropped, so keep it alive for as
/// long as the crop is being read.
pub fn crop_to_temp(path: &Path, region: &Rect) -> Result<NamedTempFile> {
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let (w, h) = (img.width(), img.height());
    let x0 = (region.left.max(0.0) as u32).min(w);
    let y0 = (region.top.max(0.0) as u32).min(h);
    let x1 = (region.right.max(0.0) as u32).min(w);
    let y1 = (region.bottom.max(0.0) as u32).min(h);

    let cropped = img.crop_imm(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0));

    let temp = NamedTempFile::with_suffix(".png")?;
    cropped
        .save(temp.path())
        .with_context(|| format!("failed to save crop of {}", path.display()))?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn write_test_image(dir: &Path, w: u32, h: u32) -> std::path::PathBuf {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let path = dir.join("test.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_image_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 120, 80);
        assert_eq!(image_dimensions(&path).unwrap(), (120, 80));
    }

    #[test]
    fn test_crop_to_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 200);

        let region = Rect {
            left: 10.0,
            right: 60.0,
            top: 50.0,
            bottom: 70.0,
        };
        let temp = crop_to_temp(&path, &region).unwrap();
        let cropped = image::open(temp.path()).unwrap().to_rgba8();

        assert_eq!(cropped.dimensions(), (50, 20));
        // Top-left pixel should be (10, 50) from the original
        assert_eq!(cropped.get_pixel(0, 0)[0], 10);
        assert_eq!(cropped.get_pixel(0, 0)[1], 50);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 100);

        let region = Rect {
            left: -30.0,
            right: 150.0,
            top: 90.0,
            bottom: 400.0,
        };
        let temp = crop_to_temp(&path, &region).unwrap();
        let cropped = image::open(temp.path()).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (100, 10));
    }
}
