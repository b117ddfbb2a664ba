//! In-memory query builder: search, filter, sort, paginate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::search::{matches_text, Page, Searchable};

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Rating,
    Name,
    Price,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
            SortKey::Rating => "rating",
            SortKey::Name => "name",
            SortKey::Price => "price",
        }
    }

    /// Parse either spelling (`createdAt` or `created_at`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "").as_str() {
            "createdat" | "date" | "newest" => Some(SortKey::CreatedAt),
            "updatedat" => Some(SortKey::UpdatedAt),
            "rating" => Some(SortKey::Rating),
            "name" | "title" => Some(SortKey::Name),
            "price" => Some(SortKey::Price),
            _ => None,
        }
    }

    /// Order used when a caller names the key but not the direction.
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortKey::CreatedAt | SortKey::UpdatedAt | SortKey::Rating => SortOrder::Desc,
            SortKey::Name | SortKey::Price => SortOrder::Asc,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A query over an in-memory record set.
///
/// Filters apply first, then free-text search, then a stable sort, then
/// pagination. `page_size` of zero or less returns every match on page 1.
///
/// # Example
///
/// ```rust,ignore
/// let page = Query::new()
///     .search("shirt")
///     .filter(|p: &Product| p.in_stock)
///     .sort(SortKey::Price, SortOrder::Asc)
///     .paginate(1, 20)
///     .run(products);
/// ```
pub struct Query<T> {
    search: Option<String>,
    filters: Vec<Predicate<T>>,
    sort: Option<(SortKey, SortOrder)>,
    page: i64,
    page_size: i64,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: None,
            page: 1,
            page_size: 0,
        }
    }
}

impl<T: Searchable> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search. Blank text is ignored.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(predicate));
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some((key, order));
        self
    }

    pub fn paginate(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Whether the query does anything beyond returning every record.
    pub fn is_noop(&self) -> bool {
        self.search.is_none() && self.filters.is_empty() && self.sort.is_none() && self.page_size <= 0
    }

    pub fn run(&self, items: impl IntoIterator<Item = T>) -> Page<T> {
        let mut matched: Vec<T> = items
            .into_iter()
            .filter(|item| self.filters.iter().all(|f| f(item)))
            .filter(|item| {
                self.search
                    .as_deref()
                    .map_or(true, |needle| matches_text(item, needle))
            })
            .collect();

        if let Some((key, order)) = self.sort {
            matched.sort_by(|a, b| {
                let ordering = a.sort_value(key).compare(&b.sort_value(key));
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        Page::slice(matched, self.page, self.page_size)
    }
}

/// Listing parameters read from a query string.
///
/// Recognizes `search`, `sortBy`, `sortOrder`, `page` and `limit`.
/// Malformed numbers fall back to the defaults (page 1, no limit).
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<(SortKey, SortOrder)>,
    pub page: i64,
    pub limit: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: None,
            sort: None,
            page: 1,
            limit: 0,
        }
    }
}

impl ListParams {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let get = |name: &str| params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let sort = get("sortBy")
            .or_else(|| get("sort_by"))
            .or_else(|| get("sort"))
            .and_then(SortKey::from_str)
            .map(|key| {
                let order = get("sortOrder")
                    .or_else(|| get("sort_order"))
                    .or_else(|| get("order"))
                    .and_then(SortOrder::from_str)
                    .unwrap_or_else(|| key.default_order());
                (key, order)
            });

        Self {
            search: get("search").or_else(|| get("q")).map(str::to_string),
            sort,
            page: get("page").and_then(|v| v.parse().ok()).unwrap_or(1),
            limit: get("limit")
                .or_else(|| get("page_size"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Use `sort` when the caller didn't ask for one.
    pub fn with_default_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        if self.sort.is_none() {
            self.sort = Some((key, order));
        }
        self
    }

    /// Apply search, sort and pagination to a query.
    pub fn apply<T: Searchable>(&self, mut query: Query<T>) -> Query<T> {
        if let Some(text) = &self.search {
            query = query.search(text.as_str());
        }
        if let Some((key, order)) = self.sort {
            query = query.sort(key, order);
        }
        query.paginate(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        price: Option<f64>,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn sort_value(&self, key: SortKey) -> SortValue<'_> {
            match key {
                SortKey::Price => self.price.into(),
                _ => SortValue::Text(self.name),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Red Shirt", price: Some(20.0) },
            Row { name: "Blue Shirt", price: None },
            Row { name: "Green Hat", price: Some(5.0) },
            Row { name: "Red Hat", price: Some(5.0) },
        ]
    }

    fn names(page: &Page<Row>) -> Vec<&'static str> {
        page.items.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_search_and_filter() {
        let page = Query::new()
            .search("  SHIRT ")
            .filter(|r: &Row| r.price.is_some())
            .run(rows());
        assert_eq!(names(&page), vec!["Red Shirt"]);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_sort_is_stable_with_missing_first() {
        let page = Query::new().sort(SortKey::Price, SortOrder::Asc).run(rows());
        assert_eq!(names(&page), vec!["Blue Shirt", "Green Hat", "Red Hat", "Red Shirt"]);

        let page = Query::new().sort(SortKey::Price, SortOrder::Desc).run(rows());
        assert_eq!(names(&page), vec!["Red Shirt", "Green Hat", "Red Hat", "Blue Shirt"]);
    }

    #[test]
    fn test_paginate() {
        let page = Query::new()
            .sort(SortKey::Name, SortOrder::Asc)
            .paginate(2, 3)
            .run(rows());
        assert_eq!(names(&page), vec!["Red Shirt"]);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next);
    }

    const LETTERS: [&str; 23] = [
        "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q",
        "r", "s", "t", "u", "v", "w",
    ];

    fn lettered(total: usize) -> Vec<Row> {
        LETTERS[..total]
            .iter()
            .copied()
            .enumerate()
            .map(|(i, name)| Row {
                name,
                price: if i % 5 == 0 { None } else { Some((i % 3) as f64) },
            })
            .collect()
    }

    fn sorted_query() -> Query<Row> {
        Query::new()
            .filter(|r: &Row| r.name != "c")
            .sort(SortKey::Price, SortOrder::Desc)
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        for total in [0, 1, 2, 5, 12, 23] {
            let expected = sorted_query().run(lettered(total)).items;
            let matched = expected.len() as i64;

            for page_size in 1..=7 {
                let first = sorted_query().paginate(1, page_size).run(lettered(total));
                let total_pages = first.pagination.total_pages;
                let ceil = (matched + page_size - 1) / page_size;
                assert_eq!(total_pages, ceil.max(1), "total={} size={}", total, page_size);
                assert_eq!(first.pagination.total, matched);

                let mut joined = Vec::new();
                for page in 1..=total_pages {
                    let slice = sorted_query().paginate(page, page_size).run(lettered(total));
                    assert!(slice.len() as i64 <= page_size);
                    assert_eq!(slice.pagination.has_next, page < total_pages);
                    assert_eq!(slice.pagination.has_prev, page > 1);
                    joined.extend(slice.items);
                }
                assert_eq!(joined, expected, "total={} size={}", total, page_size);

                let beyond = sorted_query()
                    .paginate(total_pages + 1, page_size)
                    .run(lettered(total));
                assert!(beyond.is_empty());
            }
        }
    }

    #[test]
    fn test_noop() {
        assert!(Query::<Row>::new().is_noop());
        assert!(!Query::<Row>::new().search("x").is_noop());
    }

    #[test]
    fn test_list_params() {
        let query: HashMap<String, String> = [
            ("search", "hat"),
            ("sortBy", "createdAt"),
            ("page", "x"),
            ("limit", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let params = ListParams::from_query(&query);
        assert_eq!(params.search.as_deref(), Some("hat"));
        assert_eq!(params.sort, Some((SortKey::CreatedAt, SortOrder::Desc)));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn test_list_params_default_sort() {
        let params = ListParams::from_query(&HashMap::new())
            .with_default_sort(SortKey::Name, SortOrder::Asc);
        assert_eq!(params.sort, Some((SortKey::Name, SortOrder::Asc)));
        assert_eq!(params.limit, 0);
    }
}
