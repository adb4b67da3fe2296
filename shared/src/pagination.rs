//! Offset pagination
//!
//! A page is "full" when it holds exactly `limit` records; a short page is
//! the only end-of-data signal. Callers advance `offset` by the number of
//! records actually returned.

use serde::{Deserialize, Serialize};

/// Default page size used by list views
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a single request may ask for
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Build from optional query parameters, clamping the limit into `1..=MAX_PAGE_SIZE`
    pub fn from_query(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        }
    }

    /// The window that follows a page that returned `returned` records
    pub fn next(self, returned: usize) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(returned as u32),
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub returned_count: usize,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>) -> Self {
        let returned_count = records.len();
        Self {
            records,
            returned_count,
        }
    }

    /// Whether more records may exist after this page
    pub fn is_full(&self, limit: u32) -> bool {
        self.returned_count == limit as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_defaults_and_clamps() {
        assert_eq!(PageRequest::from_query(None, None), PageRequest::new(10, 0));
        assert_eq!(PageRequest::from_query(Some(0), Some(5)), PageRequest::new(1, 5));
        assert_eq!(PageRequest::from_query(Some(500), None), PageRequest::new(100, 0));
    }

    #[test]
    fn test_next_advances_by_returned() {
        let page = PageRequest::new(10, 0);
        assert_eq!(page.next(10), PageRequest::new(10, 10));
        assert_eq!(page.next(10).next(5), PageRequest::new(10, 15));
    }

    #[test]
    fn test_short_page_signals_end() {
        let full = Page::new(vec![1; 10]);
        assert!(full.is_full(10));
        let short = Page::new(vec![1; 5]);
        assert!(!short.is_full(10));
        assert_eq!(short.returned_count, 5);
    }
}
