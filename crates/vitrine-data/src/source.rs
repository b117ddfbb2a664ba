//! Where dataset bytes come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::LoadError;

/// A source of raw dataset documents.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the raw bytes of the named resource.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError>;

    /// Names of the resources this source can serve, when known.
    async fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Reads `{root}/{name}.json` from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at a data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }
}

#[async_trait]
impl DatasetSource for DirSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.path_for(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(name.to_string()))
            }
            Err(source) => Err(LoadError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    async fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(&self.root).await else {
            return names;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        names
    }
}

/// Serves datasets from memory, e.g. documents compiled in with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, Vec<u8>>,
}

impl StaticSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under a resource name.
    pub fn with(mut self, name: impl Into<String>, document: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(name.into(), document.into());
        self
    }

    /// Add a JSON value under a resource name.
    pub fn with_json(self, name: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with(name, value.to_string())
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
    }

    async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.documents.keys().cloned().collect();
        names.sort();
        names
    }
}
