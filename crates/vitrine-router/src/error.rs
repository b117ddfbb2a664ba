//! Router error types.

use std::path::PathBuf;

use thiserror::Error;
use vitrine_cache::CacheError;
use vitrine_commerce::CommerceError;
use vitrine_data::LoadError;

use crate::reply::Reply;

/// Failures that escape a handler.
///
/// Domain outcomes (missing records, rejected input) are not errors at this
/// level; they become [`Reply::Failure`] responses.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A bundled dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] LoadError),

    /// The overlay store failed.
    #[error(transparent)]
    Storage(#[from] CacheError),

    /// A record could not be encoded into a response.
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from reading or writing router configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a handler stopped early.
///
/// Domain errors end up as failure replies; everything else escapes the
/// router as a [`RouterError`].
#[derive(Debug)]
pub(crate) enum Rejection {
    Domain(CommerceError),
    Fault(RouterError),
}

impl From<CommerceError> for Rejection {
    fn from(e: CommerceError) -> Self {
        Rejection::Domain(e)
    }
}

impl From<RouterError> for Rejection {
    fn from(e: RouterError) -> Self {
        Rejection::Fault(e)
    }
}

impl From<LoadError> for Rejection {
    fn from(e: LoadError) -> Self {
        Rejection::Fault(e.into())
    }
}

impl From<CacheError> for Rejection {
    fn from(e: CacheError) -> Self {
        Rejection::Fault(e.into())
    }
}

impl From<serde_json::Error> for Rejection {
    fn from(e: serde_json::Error) -> Self {
        Rejection::Fault(e.into())
    }
}

/// Turn a handler result into a reply.
///
/// Storage failures keep propagating; every other domain error becomes a
/// failure reply carrying its status code.
pub(crate) fn settle(result: Result<Reply, Rejection>) -> Result<Reply, RouterError> {
    match result {
        Ok(reply) => Ok(reply),
        Err(Rejection::Domain(CommerceError::Storage(e))) => Err(RouterError::Storage(e)),
        Err(Rejection::Domain(e)) => Ok(Reply::failure(e.status_code(), e.to_string())),
        Err(Rejection::Fault(e)) => Err(e),
    }
}
