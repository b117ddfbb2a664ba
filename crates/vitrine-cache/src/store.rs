//! Raw document storage backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::{CacheError, DocumentKey};

/// Byte-level storage for whole overlay documents.
///
/// Implementations replace a document as a unit on `save`; there are no
/// partial-field updates at this boundary.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document. Returns `None` if the key doesn't exist.
    async fn load(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace a document.
    async fn save(&self, key: &DocumentKey, bytes: Vec<u8>) -> Result<(), CacheError>;

    /// Delete a document. Returns whether it existed.
    async fn remove(&self, key: &DocumentKey) -> Result<bool, CacheError>;

    /// Every key currently stored.
    async fn keys(&self) -> Result<Vec<DocumentKey>, CacheError>;
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn save(&self, key: &DocumentKey, bytes: Vec<u8>) -> Result<(), CacheError> {
        self.documents.write().await.insert(*key, bytes);
        Ok(())
    }

    async fn remove(&self, key: &DocumentKey) -> Result<bool, CacheError> {
        Ok(self.documents.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<DocumentKey>, CacheError> {
        let mut keys: Vec<DocumentKey> = self.documents.read().await.keys().copied().collect();
        keys.sort();
        Ok(keys)
    }
}

/// One JSON file per document in a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CacheError::Open {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &DocumentKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.storage_name()))
    }
}

fn io_error(key: &DocumentKey, source: std::io::Error) -> CacheError {
    CacheError::Io {
        key: key.storage_name(),
        source,
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn load(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, CacheError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn save(&self, key: &DocumentKey, bytes: Vec<u8>) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(key, e))
    }

    async fn remove(&self, key: &DocumentKey) -> Result<bool, CacheError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn keys(&self) -> Result<Vec<DocumentKey>, CacheError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|source| CacheError::Open {
                path: self.dir.clone(),
                source,
            })?;

        let mut keys = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match DocumentKey::parse(stem) {
                Some(key) => keys.push(key),
                None => warn!(file = %path.display(), "ignoring unrecognized overlay file"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
