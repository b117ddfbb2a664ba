//! Uncached dataset loading.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::source::DatasetSource;
use crate::LoadError;

/// Loads and parses named datasets from a [`DatasetSource`].
///
/// Every call goes back to the source. Wrap the loader in a
/// [`DatasetCache`](crate::DatasetCache) to keep parsed snapshots around.
#[derive(Clone)]
pub struct DatasetLoader {
    source: Arc<dyn DatasetSource>,
}

impl DatasetLoader {
    /// Create a loader over a source.
    pub fn new(source: impl DatasetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Create a loader over a shared source.
    pub fn from_arc(source: Arc<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// Fetch and parse a dataset as a list of records.
    #[instrument(skip(self))]
    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, LoadError> {
        let bytes = self.source.fetch(name).await?;
        let records: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
                name: name.to_string(),
                source,
            })?;
        debug!(count = records.len(), "dataset loaded");
        Ok(records)
    }

    /// Names the underlying source advertises.
    pub async fn names(&self) -> Vec<String> {
        self.source.names().await
    }
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticSource;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Banner {
        id: u64,
    }

    #[tokio::test]
    async fn test_load_parses_records() {
        let loader = DatasetLoader::new(StaticSource::new().with("banners", "[{\"id\":1},{\"id\":2}]"));
        let banners: Vec<Banner> = loader.load("banners").await.unwrap();
        assert_eq!(banners, vec![Banner { id: 1 }, Banner { id: 2 }]);
    }

    #[tokio::test]
    async fn test_load_malformed() {
        let loader = DatasetLoader::new(StaticSource::new().with("banners", "{not json"));
        let err = loader.load::<Banner>("banners").await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert_eq!(err.dataset(), "banners");
    }

    #[tokio::test]
    async fn test_load_missing() {
        let loader = DatasetLoader::new(StaticSource::new());
        assert!(matches!(
            loader.load::<Banner>("banners").await,
            Err(LoadError::NotFound(_))
        ));
    }
}
