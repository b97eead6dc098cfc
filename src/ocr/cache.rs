//! Content-addressed OCR result cache.
//!
//! Entries are keyed by the SHA-256 of the raw image file bytes, so two
//! byte-identical images under different names share one entry while two
//! different crops of the same screenshot stay distinct. Values are the
//! serialized detection list. Entries are never invalidated except by
//! deleting the cache directory.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use super::engine::TextBox;

pub struct OcrCache {
    root: PathBuf,
}

impl OcrCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Computes the cache key for an image's raw bytes.
    pub fn key_for(image_bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(image_bytes))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Loads a cached result, or `None` on miss.
    ///
    /// Read or decode failures count as misses: the caller falls back to a
    /// live OCR run and the pipeline output is unchanged.
    pub fn load(&self, key: &str) -> Option<Vec<TextBox>> {
        let path = self.entry_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                crate::log(&format!("Cache read failed for {}: {}", path.display(), e));
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(boxes) => Some(boxes),
            Err(e) => {
                crate::log(&format!(
                    "Cache entry {} is unreadable: {}. Ignoring it.",
                    path.display(),
                    e
                ));
                None
            }
        }
    }

    /// Stores a result under its key.
    ///
    /// Directory creation is idempotent, so concurrent pipelines can race
    /// here freely. A same-key write race is last-writer-wins; the content is
    /// a deterministic function of the key, so both writers carry the same
    /// payload. Failures are logged and swallowed: the cache is an
    /// optimization, never a reason to abort.
    pub fn store(&self, key: &str, boxes: &[TextBox]) {
        if let Err(e) = self.try_store(key, boxes) {
            crate::log(&format!("Cache write failed for key {}: {}", key, e));
        }
    }

    fn try_store(&self, key: &str, boxes: &[TextBox]) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string(boxes)?;
        fs::write(self.entry_path(key), json)?;
        Ok(())
    }
}
