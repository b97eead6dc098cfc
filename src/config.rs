//! Pipeline configuration.
//!
//! Loads settings from config.json next to the executable. Everything has a
//! default, so a missing or partial file still produces a working pipeline.
//! The config is passed explicitly into the pipeline constructor; there is
//! no process-wide toggle.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Pixel padding applied around the located participant table when cropping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CropPadding {
    /// Extra pixels below the lowest role label
    pub bottom: f32,
    /// Extra pixels right of the lowest role label
    pub right: f32,
    /// Extra pixels extending left of the leftmost "player" text
    pub left: f32,
}

impl Default for CropPadding {
    fn default() -> Self {
        Self {
            bottom: 50.0,
            right: 30.0,
            left: 30.0,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Whether OCR results are cached by image content hash
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Directory holding cached OCR results
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,
    /// Vertical tolerance when assigning fragments to row anchors
    #[serde(default = "default_row_padding")]
    pub row_padding_px: f32,
    /// Padding around the located table crop
    #[serde(default)]
    pub crop_padding_px: CropPadding,
    /// OCR executable to invoke (name on PATH or absolute path)
    #[serde(default = "default_ocr_executable")]
    pub ocr_executable: PathBuf,
    /// OCR language code
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_root() -> PathBuf {
    paths::default_cache_dir()
}

fn default_row_padding() -> f32 {
    30.0
}

fn default_ocr_executable() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            cache_root: default_cache_root(),
            row_padding_px: default_row_padding(),
            crop_padding_px: CropPadding::default(),
            ocr_executable: default_ocr_executable(),
            ocr_language: default_ocr_language(),
        }
    }
}

/// Loads configuration from config.json next to the executable, or returns
/// defaults when the file is missing or unreadable.
pub fn load_config() -> PipelineConfig {
    let config_path = paths::get_exe_dir().join("config.json");

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    }

    PipelineConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.cache_enabled);
        assert_eq!(config.row_padding_px, 30.0);
        assert_eq!(config.crop_padding_px.bottom, 50.0);
        assert_eq!(config.crop_padding_px.right, 30.0);
        assert_eq!(config.crop_padding_px.left, 30.0);
        assert_eq!(config.ocr_language, "eng");
    }

    #[test]
    fn test_partial_json_takes_field_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "cache_enabled": false, "row_padding_px": 18.0 }"#).unwrap();
        assert!(!config.cache_enabled);
        assert_eq!(config.row_padding_px, 18.0);
        // Untouched fields fall back per-field
        assert_eq!(config.crop_padding_px.bottom, 50.0);
        assert_eq!(config.ocr_executable, PathBuf::from("tesseract"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cache_enabled, config.cache_enabled);
        assert_eq!(back.cache_root, config.cache_root);
    }
}
