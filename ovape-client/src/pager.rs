//! "Load more" pagination state

use shared::PageRequest;
use shared::pagination::DEFAULT_PAGE_SIZE;

/// Offset tracking for list views
///
/// The offset advances by the number of records actually returned; a page
/// shorter than `limit` means the end was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    limit: u32,
    offset: u32,
    has_more: bool,
}

impl Pager {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
            has_more: true,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Window for the next fetch
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }

    /// Record a fetched page
    pub fn advance(&mut self, returned: usize) {
        self.offset = self.request().next(returned).offset;
        self.has_more = returned == self.limit as usize;
    }

    /// Start over (new search, filter change, refresh)
    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
