use serde::{Deserialize, Serialize};

use super::search::{MAX_PAGE, MIN_PAGE};

/// Where the user is within a result set: (current page, total pages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    pub page: u32,
    pub total_pages: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            total_pages: 1,
        }
    }
}

impl PaginationCursor {
    /// Back to (1, 1); used whenever the search text changes
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_first(&self) -> bool {
        self.page <= MIN_PAGE
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages || self.page >= MAX_PAGE
    }

    /// Moves one page forward. Returns false (and leaves the cursor alone)
    /// on the last page.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Moves one page back. Returns false (and leaves the cursor alone)
    /// on the first page.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Records the page count reported by the database. A reported count of
    /// zero (no matches) is stored as one so the cursor stays on a real page.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.clamp(1, MAX_PAGE);
    }
}
