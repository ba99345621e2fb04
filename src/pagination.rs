//! Page arithmetic shared by listings.

use serde::Serialize;

/// Fixed page size of the entry listing.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Requested page and page size. `page` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of pages needed for `total` items; an empty listing still has
    /// one (empty) page.
    pub fn total_pages(&self, total: usize) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        total.div_ceil(self.per_page).max(1)
    }

    /// Requested page clamped into `1..=total_pages`.
    pub fn clamped_page(&self, total: usize) -> usize {
        self.page.clamp(1, self.total_pages(total))
    }

    /// Row offset of the clamped page.
    pub fn offset(&self, total: usize) -> usize {
        (self.clamped_page(total) - 1) * self.per_page
    }
}

/// One page of items plus the navigation data templates need.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_items: usize) -> Self {
        let page = pagination.clamped_page(total_items);
        let total_pages = pagination.total_pages(total_items);
        Self {
            items,
            page,
            total_pages,
            total_items,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}
