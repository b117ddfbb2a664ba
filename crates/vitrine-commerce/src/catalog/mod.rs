//! Product catalog module.
//!
//! Contains types for products, categories, and collections, and the logic
//! that resolves a collection to its products.

mod category;
mod collection;
mod product;
mod resolver;

pub use category::{children_of, top_level, Category};
pub use collection::{Collection, CollectionRules, CollectionType};
pub use product::{OptionChoice, Product, ProductOption};
pub use resolver::resolve_collection;
