//! Page windowing over a known total.
//!
//! Out-of-range pages are never rejected. They simply select nothing, and the
//! navigation flags tell the view which controls to disable.

/// Number of pages needed for `total` items, `0` when there are none.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PageWindow {
    pub fn new(total: u64, page_size: u32, page: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.page_size)
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// Apply the window to a complete, already ordered result set.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect()
    }
}
