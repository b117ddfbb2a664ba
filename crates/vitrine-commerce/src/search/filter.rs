//! Text matching and sort values.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::search::SortKey;

/// A value a record exposes for sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
    Time(DateTime<Utc>),
}

impl SortValue<'_> {
    /// Ascending order. Missing values sort first.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Less,
            (_, SortValue::Missing) => Ordering::Greater,
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for SortValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(SortValue::Missing, SortValue::Number)
    }
}

impl From<Option<DateTime<Utc>>> for SortValue<'_> {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(SortValue::Missing, SortValue::Time)
    }
}

/// Records the query engine can search and sort.
pub trait Searchable {
    /// Text fields free-text search looks in.
    fn search_fields(&self) -> Vec<&str>;

    /// The value to sort by for a key.
    fn sort_value(&self, key: SortKey) -> SortValue<'_>;
}

/// Case-insensitive substring match against any search field.
///
/// `needle` must already be lowercased.
pub fn matches_text<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}
