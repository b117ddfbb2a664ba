//! Query engine over in-memory record sets.
//!
//! Provides free-text search, predicate filters, stable sorting, and
//! pagination for any [`Searchable`] record.

mod filter;
mod query;
mod results;

pub use filter::{matches_text, Searchable, SortValue};
pub use query::{ListParams, Query, SortKey, SortOrder};
pub use results::{Page, Pagination};
