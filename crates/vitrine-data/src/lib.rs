//! Bundled dataset loading for the Vitrine storefront layer.
//!
//! Reference data (products, categories, collections, coupons, ...) ships as
//! JSON documents next to the application. This crate fetches and parses
//! them:
//!
//! - [`DatasetSource`] abstracts where the bytes come from ([`DirSource`] for
//!   a data directory, [`StaticSource`] for in-memory documents).
//! - [`DatasetLoader`] parses a named dataset on every call.
//! - [`DatasetCache`] keeps parsed snapshots until `refresh()` is called.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_data::{Dataset, DatasetCache, DatasetLoader, DirSource};
//!
//! let cache = DatasetCache::new(DatasetLoader::new(DirSource::new("data")));
//! let products: Arc<Vec<Product>> = cache.get(Dataset::Products.name()).await?;
//! ```

mod cache;
mod dataset;
mod error;
mod loader;
mod source;

pub use cache::DatasetCache;
pub use dataset::Dataset;
pub use error::LoadError;
pub use loader::DatasetLoader;
pub use source::{DatasetSource, DirSource, StaticSource};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Dataset, DatasetCache, DatasetLoader, DatasetSource, LoadError};
}
