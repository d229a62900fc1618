//! Local persistence of the state document and export/import files.

pub mod local;
pub mod transfer;

use std::path::PathBuf;

use thiserror::Error;

pub use local::LocalStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("import from {path} failed: {reason}")]
    Import { path: PathBuf, reason: String },
}
