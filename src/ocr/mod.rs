pub mod cache;
pub mod engine;

pub use cache::OcrCache;
pub use engine::{OcrEngine, OcrError, TesseractEngine, TextBox};

use std::fs;
use std::path::Path;

/// Runs recognition with an optional content-addressed cache in front.
///
/// The image file bytes are hashed; a hit skips the engine entirely, a miss
/// runs the engine and stores the result. Output is bit-identical either way.
pub fn recognize_cached(
    engine: &dyn OcrEngine,
    cache: Option<&OcrCache>,
    image_path: &Path,
) -> Result<Vec<TextBox>, OcrError> {
    let Some(cache) = cache else {
        return engine.recognize(image_path);
    };

    let image_bytes = fs::read(image_path)?;
    let key = OcrCache::key_for(&image_bytes);

    if let Some(hit) = cache.load(&key) {
        crate::log(&format!(
            "Using cached OCR result for {}",
            image_path.display()
        ));
        return Ok(hit);
    }

    let boxes = engine.recognize(image_path)?;
    cache.store(&key, &boxes);
    Ok(boxes)
}
