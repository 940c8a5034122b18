//! Table view configuration

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Configuration for a [`TableView`](crate::view::TableView).
///
/// # Example
///
/// ```
/// use fleetgrid_lib::ViewConfig;
///
/// let config = ViewConfig::default()
///     .with_page_size(25)
///     .with_reset_selection_after_bulk(false);
/// assert_eq!(config.page_size().unwrap().get(), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    ///
    /// Default: 50
    pub page_size: usize,

    /// Clear the selection once a bulk action succeeds.
    ///
    /// Default: true
    pub reset_selection_after_bulk: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            reset_selection_after_bulk: true,
        }
    }
}

impl ViewConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets whether a successful bulk action clears the selection.
    pub fn with_reset_selection_after_bulk(mut self, reset: bool) -> Self {
        self.reset_selection_after_bulk = reset;
        self
    }

    /// Returns the validated page size.
    pub fn page_size(&self) -> Result<NonZeroUsize, ViewError> {
        NonZeroUsize::new(self.page_size).ok_or(ViewError::InvalidPageSize(self.page_size))
    }
}
