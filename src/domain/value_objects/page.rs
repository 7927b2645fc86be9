//! Paged result set.

use serde::Serialize;

/// One page of a larger, ordered result set.
///
/// `page` is 1-indexed, the way callers address pages. Stores work with a
/// 0-indexed page number and build pages through [`Page::from_index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Build a page from a 0-indexed page number.
    pub fn from_index(items: Vec<T>, page_index: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_items + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            page: page_index + 1,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Row offset of this page for a LIMIT/OFFSET query, `None` on overflow.
    pub fn offset(page_index: i64, page_size: i64) -> Option<i64> {
        page_index.checked_mul(page_size)
    }

    /// Map every item, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
