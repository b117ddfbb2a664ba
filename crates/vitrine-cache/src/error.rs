//! Overlay error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing overlay documents.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a document.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored document could not be decoded.
    #[error("Corrupt document {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to perform a store operation.
    #[error("Store operation failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
