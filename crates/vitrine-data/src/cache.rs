//! Explicit snapshot cache over a [`DatasetLoader`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{DatasetLoader, LoadError};

type Snapshot = Arc<dyn Any + Send + Sync>;

/// Caches parsed dataset snapshots until explicitly refreshed.
///
/// Snapshots are keyed by dataset name and shared as `Arc<Vec<T>>`. Asking
/// for the same name with a different record type reloads and replaces the
/// entry.
#[derive(Clone, Debug)]
pub struct DatasetCache {
    loader: DatasetLoader,
    entries: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl DatasetCache {
    /// Create an empty cache over a loader.
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The uncached loader underneath.
    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Get a snapshot, loading it on first use.
    pub async fn get<T>(&self, name: &str) -> Result<Arc<Vec<T>>, LoadError>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if let Some(entry) = self.entries.read().await.get(name) {
            if let Ok(records) = Arc::clone(entry).downcast::<Vec<T>>() {
                return Ok(records);
            }
        }

        let records = Arc::new(self.loader.load::<T>(name).await?);
        self.entries
            .write()
            .await
            .insert(name.to_string(), records.clone());
        Ok(records)
    }

    /// Drop one cached snapshot so the next read reloads it.
    pub async fn invalidate(&self, name: &str) -> bool {
        let removed = self.entries.write().await.remove(name).is_some();
        if removed {
            debug!(dataset = name, "dataset snapshot invalidated");
        }
        removed
    }

    /// Drop every cached snapshot.
    pub async fn refresh(&self) {
        let mut entries = self.entries.write().await;
        debug!(count = entries.len(), "dataset cache refreshed");
        entries.clear();
    }

    /// Names currently held in the cache.
    pub async fn cached(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatasetSource, StaticSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: StaticSource,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl DatasetSource for CountingSource {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(name).await
        }
    }

    fn counting() -> Arc<CountingSource> {
        Arc::new(CountingSource {
            inner: StaticSource::new().with("clients", "[1,2,3]"),
            fetches: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let source = counting();
        let cache = DatasetCache::new(DatasetLoader::from_arc(source.clone()));

        let first: Arc<Vec<u32>> = cache.get("clients").await.unwrap();
        let second: Arc<Vec<u32>> = cache.get("clients").await.unwrap();

        assert_eq!(*first, vec![1, 2, 3]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_forces_reload() {
        let source = counting();
        let cache = DatasetCache::new(DatasetLoader::from_arc(source.clone()));

        let _: Arc<Vec<u32>> = cache.get("clients").await.unwrap();
        cache.refresh().await;
        assert!(cache.cached().await.is_empty());
        let _: Arc<Vec<u32>> = cache.get("clients").await.unwrap();

        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_single_entry() {
        let source = counting();
        let cache = DatasetCache::new(DatasetLoader::from_arc(source.clone()));

        let _: Arc<Vec<u32>> = cache.get("clients").await.unwrap();
        assert!(cache.invalidate("clients").await);
        assert!(!cache.invalidate("clients").await);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = DatasetCache::new(DatasetLoader::new(StaticSource::new()));
        assert!(cache.get::<u32>("clients").await.is_err());
        assert!(cache.cached().await.is_empty());
    }
}
