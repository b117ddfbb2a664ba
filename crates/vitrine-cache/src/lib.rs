//! Durable document overlay for the Vitrine storefront layer.
//!
//! Mutable state (carts, wishlists, comments, static pages) lives in
//! whole-document JSON blobs on top of the read-only seed datasets. Every
//! mutation reads the current document, changes it in memory, and writes the
//! whole thing back; every write broadcasts a [`ChangeEvent`] so observers
//! can resynchronize without polling.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_cache::{Overlay, FileStore, Repository};
//!
//! let overlay = Overlay::new(FileStore::open(".vitrine/overlay").await?);
//! let carts: Repository<Cart> = Repository::new(overlay.clone());
//!
//! let mut events = overlay.subscribe();
//! carts.update(user_id, |cart| cart.clear()).await?;
//! assert_eq!(events.recv().await?.family, ResourceFamily::Cart);
//! ```

mod error;
mod key;
mod overlay;
mod repository;
mod store;

pub use error::CacheError;
pub use key::{DocumentKey, ResourceFamily, Scope};
pub use overlay::{ChangeEvent, ChangeKind, Overlay};
pub use repository::{Document, Repository};
pub use store::{DocumentStore, FileStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CacheError, ChangeEvent, Document, DocumentKey, Overlay, Repository, ResourceFamily, Scope,
    };
}
