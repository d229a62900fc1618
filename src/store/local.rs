use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::StoreError;
use crate::core::normalize::{normalize, normalize_json};
use crate::core::state::AppState;

/// The state document on local disk.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalize the stored document. A missing or corrupt file
    /// yields the default state.
    pub fn load(&self, today: NaiveDate) -> AppState {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => normalize_json(&content, today),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No stored state at {}, starting fresh", self.path.display());
                normalize(None, today)
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                normalize(None, today)
            }
        }
    }

    /// Write the document, replacing the previous one in a single rename.
    pub fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        write_replacing(&self.path, json.as_bytes())
    }

    /// Save, logging instead of returning failures.
    pub fn persist(&self, state: &AppState) {
        if let Err(e) = self.save(state) {
            log::error!("Failed to save state: {}", e);
        }
    }
}

pub(crate) fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let wrap = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes).map_err(wrap)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        wrap(e)
    })
}
