//! Typed overlay over a [`DocumentStore`] with change notifications.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::store::{DocumentStore, MemoryStore};
use crate::{CacheError, DocumentKey, ResourceFamily, Scope};

/// Buffered change events per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Written,
    Removed,
}

/// Emitted after every successful overlay write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub family: ResourceFamily,
    pub scope: Scope,
    pub kind: ChangeKind,
}

/// The mutable, durable document layer.
///
/// Cloning is cheap and every clone shares the same store and event channel.
/// Writers are not coordinated: two read-modify-write sequences racing on
/// the same key resolve as last write wins.
#[derive(Clone)]
pub struct Overlay {
    store: Arc<dyn DocumentStore>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Overlay {
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<dyn DocumentStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// An overlay backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Receive change events for every family.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Read and decode a document. Returns `None` if it doesn't exist.
    pub async fn get<T: DeserializeOwned>(&self, key: &DocumentKey) -> Result<Option<T>, CacheError> {
        match self.store.load(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| CacheError::Corrupt {
                    key: key.storage_name(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Replace a document and notify subscribers.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn put<T: Serialize>(&self, key: &DocumentKey, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.save(key, bytes).await?;
        debug!("overlay document written");
        self.notify(key, ChangeKind::Written);
        Ok(())
    }

    /// Delete a document, notifying subscribers if it existed.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn delete(&self, key: &DocumentKey) -> Result<bool, CacheError> {
        let removed = self.store.remove(key).await?;
        if removed {
            debug!("overlay document removed");
            self.notify(key, ChangeKind::Removed);
        }
        Ok(removed)
    }

    /// Check if a document exists.
    pub async fn exists(&self, key: &DocumentKey) -> Result<bool, CacheError> {
        Ok(self.store.load(key).await?.is_some())
    }

    /// Every stored key.
    pub async fn keys(&self) -> Result<Vec<DocumentKey>, CacheError> {
        self.store.keys().await
    }

    fn notify(&self, key: &DocumentKey, kind: ChangeKind) {
        // No subscribers is not an error.
        let _ = self.events.send(ChangeEvent {
            family: key.family,
            scope: key.scope,
            kind,
        });
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
