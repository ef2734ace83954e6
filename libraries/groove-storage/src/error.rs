/// Storage-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// File contents could not be parsed
    #[error("Corrupt store file {path:?}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Store deliberately rejecting writes (test fault injection)
    #[error("Store is unavailable")]
    Unavailable,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for groove_core::CoreError {
    fn from(err: StorageError) -> Self {
        groove_core::CoreError::storage(err.to_string())
    }
}
