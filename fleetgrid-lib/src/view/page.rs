//! Pagination window.
//!
//! Pages are 1-indexed. A page past the end is clamped to the last page and
//! page 0 is read as page 1, so a filter that shrinks the row set never
//! leaves the user on an empty page.

use std::num::NonZeroUsize;

use crate::error::ViewError;

/// Returns the rows shown on `current_page`.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use fleetgrid_lib::view::get_page;
///
/// let rows: Vec<u32> = (0..25).collect();
/// let size = NonZeroUsize::new(10).unwrap();
/// assert_eq!(get_page(&rows, size, 3), &rows[20..25]);
/// // Clamped to the last page.
/// assert_eq!(get_page(&rows, size, 4), &rows[20..25]);
/// ```
pub fn get_page<T>(rows: &[T], page_size: NonZeroUsize, current_page: usize) -> &[T] {
    let page = clamp_page(current_page, total_pages(rows.len(), page_size));
    let start = (page - 1) * page_size.get();
    let end = (start + page_size.get()).min(rows.len());
    &rows[start.min(end)..end]
}

/// Number of pages needed for `total` rows. Zero rows need zero pages.
pub fn total_pages(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.max(1).min(total_pages.max(1))
}

/// Page size and current page of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: NonZeroUsize,
    current_page: usize,
}

impl Pagination {
    /// Creates pagination on page 1.
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    /// Creates pagination from a raw page size, rejecting zero.
    pub fn with_page_size(page_size: usize) -> Result<Self, ViewError> {
        NonZeroUsize::new(page_size)
            .map(Self::new)
            .ok_or(ViewError::InvalidPageSize(page_size))
    }

    /// Returns the page size.
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Returns the requested page. It may exceed the available pages until
    /// [`Pagination::clamp`] is called; windows are always clamped.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the number of pages for `total` rows.
    pub fn total_pages(&self, total: usize) -> usize {
        total_pages(total, self.page_size)
    }

    /// Returns the page that would be shown for `total` rows.
    pub fn effective_page(&self, total: usize) -> usize {
        clamp_page(self.current_page, self.total_pages(total))
    }

    /// Sets the current page, clamped to the pages available for `total` rows.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.current_page = clamp_page(page, self.total_pages(total));
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Moves to the page after the one shown for `total` rows, if there is
    /// one. The stored page is clamped first, so navigation after a
    /// shrinking filter starts from the page the user sees.
    pub fn next_page(&mut self, total: usize) -> bool {
        let page = self.effective_page(total);
        self.current_page = page;
        if page < self.total_pages(total) {
            self.current_page = page + 1;
            true
        } else {
            false
        }
    }

    /// Moves to the page before the one shown for `total` rows, if there is
    /// one. The stored page is clamped first, like [`Pagination::next_page`].
    pub fn prev_page(&mut self, total: usize) -> bool {
        let page = self.effective_page(total);
        self.current_page = page;
        if page > 1 {
            self.current_page = page - 1;
            true
        } else {
            false
        }
    }

    /// Pulls the current page back into range after the row count changed.
    /// Returns `true` if the page moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let page = self.effective_page(total);
        if page != self.current_page {
            log::debug!(
                "Clamping page {} to {} for {} rows",
                self.current_page,
                page,
                total
            );
            self.current_page = page;
            return true;
        }
        false
    }

    /// Returns the clamped page number together with its rows.
    pub fn window<'a, T>(&self, rows: &'a [T]) -> (usize, &'a [T]) {
        (
            self.effective_page(rows.len()),
            get_page(rows, self.page_size, self.current_page),
        )
    }
}
