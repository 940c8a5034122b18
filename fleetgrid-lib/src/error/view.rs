//! View model error types

use super::DispatchError;

/// Errors raised at the boundaries of a table view.
///
/// Row-level conditions (out-of-range pages, absent comparator values, stale
/// selections) are resolved by policy and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Two columns were defined with the same sort key.
    #[error("Duplicate sort key in column definitions: {key}")]
    DuplicateSortKey {
        /// Debug rendering of the repeated key.
        key: String,
    },

    /// A sort was requested for a key no column registers.
    #[error("Unknown sort key: {key}")]
    UnknownSortKey {
        /// Debug rendering of the requested key.
        key: String,
    },

    /// Page sizes must be at least one row.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// The bulk action dispatcher failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ViewError {
    pub(crate) fn duplicate_sort_key(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateSortKey {
            key: format!("{:?}", key),
        }
    }

    pub(crate) fn unknown_sort_key(key: &impl std::fmt::Debug) -> Self {
        Self::UnknownSortKey {
            key: format!("{:?}", key),
        }
    }
}
