//! Dataset loading error types.

use thiserror::Error;

/// Errors that can occur when loading a bundled dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The named resource does not exist in the source.
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// The resource exists but is not valid JSON for the requested shape.
    #[error("Malformed dataset {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading the resource failed.
    #[error("Failed to read dataset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Name of the dataset this error refers to.
    pub fn dataset(&self) -> &str {
        match self {
            LoadError::NotFound(name) => name,
            LoadError::Malformed { name, .. } | LoadError::Io { name, .. } => name,
        }
    }
}
