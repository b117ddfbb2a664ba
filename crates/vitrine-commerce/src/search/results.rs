//! Query results and pagination.

use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page. Zero or less means everything on one page.
    pub page_size: i64,
    /// Total number of matching items.
    pub total: i64,
    /// Total number of pages (at least 1).
    pub total_pages: i64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info. Pages below 1 are treated as page 1.
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let page = page.max(1);
        let total_pages = if page_size <= 0 || total == 0 {
            1
        } else {
            total / page_size + i64::from(total % page_size != 0)
        };

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Whether every item is on a single page.
    pub fn is_unbounded(&self) -> bool {
        self.page_size <= 0
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> i64 {
        if self.is_unbounded() {
            if self.page == 1 {
                0
            } else {
                self.total
            }
        } else {
            (self.page - 1).saturating_mul(self.page_size)
        }
    }

    /// Number of items this page can hold.
    pub fn limit(&self) -> i64 {
        if self.is_unbounded() {
            self.total
        } else {
            self.page_size
        }
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// One page of query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Slice a fully filtered and sorted result set down to one page.
    pub fn slice(all: Vec<T>, page: i64, page_size: i64) -> Self {
        let pagination = Pagination::new(page, page_size, all.len() as i64);
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(0);
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self::new(items, pagination)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(5, 10, 45);
        assert!(p.has_prev);
        assert!(!p.has_next);
        assert!(p.is_last());
    }

    #[test]
    fn test_pagination_clamps_page() {
        let p = Pagination::new(0, 10, 5);
        assert_eq!(p.page, 1);
        assert!(p.is_first());
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
    }

    #[test]
    fn test_pagination_huge_page_size() {
        let p = Pagination::new(1, i64::MAX, 25);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(3, i64::MAX, 25);
        assert_eq!(p.offset(), i64::MAX);
        assert!(p.has_prev);
    }

    #[test]
    fn test_slice_huge_page_size() {
        let page = Page::slice(vec![1, 2, 3], 1, i64::MAX);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_slice_unbounded() {
        let page = Page::slice(vec![1, 2, 3], 1, 0);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pagination.total_pages, 1);

        let past = Page::slice(vec![1, 2, 3], 2, 0);
        assert!(past.is_empty());
        assert!(past.pagination.has_prev);
    }

    #[test]
    fn test_slice_past_end() {
        let page = Page::slice(vec![1, 2, 3], 4, 2);
        assert!(page.is_empty());
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn test_slice_middle() {
        let page = Page::slice((1..=7).collect(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
    }
}
