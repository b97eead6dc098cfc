pub mod assemble;
pub mod locate;
pub mod stats;

pub use assemble::{assemble_table, AssemblyError, Table};
pub use locate::{locate_table, LocateError};
pub use stats::{parse_damage_stats, should_keep_line, DamageStats};

use anyhow::Result;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::image_io;
use crate::ocr::{recognize_cached, OcrCache, OcrEngine};

/// Role labels appearing once per data row in the participant table.
pub(crate) const ROLE_KEYWORDS: [&str; 3] = ["member", "leader", "officer"];

/// The screenshot-to-table pipeline.
///
/// Runs OCR over the full screenshot to triangulate the participant table,
/// crops it, runs OCR again on the crop, and clusters the fragments into a
/// table. Both OCR passes go through the content-addressed result cache when
/// one is configured.
pub struct DamageTableExtractor {
    engine: Box<dyn OcrEngine>,
    cache: Option<OcrCache>,
    config: PipelineConfig,
}

impl DamageTableExtractor {
    pub fn new(engine: Box<dyn OcrEngine>, config: PipelineConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| OcrCache::new(config.cache_root.clone()));
        Self {
            engine,
            cache,
            config,
        }
    }

    /// Extracts the participant damage table from a guild battle screenshot.
    pub fn extract_table(&self, image_path: &Path) -> Result<Table> {
        let (width, height) = image_io::image_dimensions(image_path)?;
        crate::log(&format!(
            "Running {} on {} ({}x{})",
            self.engine.name(),
            image_path.display(),
            width,
            height
        ));
        let full = recognize_cached(self.engine.as_ref(), self.cache.as_ref(), image_path)?;

        let region = locate_table(&full, width, height, &self.config.crop_padding_px)?;
        crate::log(&format!(
            "Participant table located: left={:.1} right={:.1} top={:.1} bottom={:.1}",
            region.left, region.right, region.top, region.bottom
        ));

        // The crop lives in a temp file just long enough for the second pass
        let crop = image_io::crop_to_temp(image_path, &region)?;
        let cropped = recognize_cached(self.engine.as_ref(), self.cache.as_ref(), crop.path())?;

        let table = assemble_table(&cropped, self.config.row_padding_px)?;
        crate::log(&format!(
            "Assembled table: {} columns, {} rows",
            table.header.len(),
            table.rows.len()
        ));
        Ok(table)
    }

    /// Extracts boss, level, and total damage from a personal damage report.
    pub fn extract_stats(&self, image_path: &Path) -> Result<DamageStats> {
        let boxes = recognize_cached(self.engine.as_ref(), self.cache.as_ref(), image_path)?;
        let lines: Vec<&str> = boxes
            .iter()
            .map(|text_box| text_box.text.as_str())
            .filter(|text| should_keep_line(text))
            .collect();
        parse_damage_stats(lines)
    }
}
