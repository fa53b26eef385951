use crate::routes::error_chain_fmt;
use std::path::PathBuf;

#[derive(thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read the subscription file {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write the subscription file {path:?}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("The subscription file {path:?} does not contain a valid subscription list")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize the subscription list")]
    Serialize(#[source] serde_json::Error),
}

impl std::fmt::Debug for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
