//! Table status resolution.

use serde::Serialize;

/// What a table should show instead of (or alongside) its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Data is still being fetched.
    Loading,
    /// The collection has no rows at all.
    Empty,
    /// Rows exist but none match the active filter.
    NoResultsForFilter,
    /// Rows are available to render.
    Ready,
}

impl TableStatus {
    /// Derives the status from the current inputs. Holds no state between
    /// calls.
    pub fn resolve(is_loading: bool, filter_active: bool, filtered_count: usize) -> Self {
        match (is_loading, filter_active, filtered_count) {
            (true, _, _) => Self::Loading,
            (false, false, 0) => Self::Empty,
            (false, true, 0) => Self::NoResultsForFilter,
            _ => Self::Ready,
        }
    }

    /// Returns `true` if rows should be rendered.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Loading => "Loading",
            Self::Empty => "No items",
            Self::NoResultsForFilter => "No items match the search criteria",
            Self::Ready => "Ready",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(TableStatus::resolve(true, false, 0), TableStatus::Loading);
        assert_eq!(TableStatus::resolve(true, true, 5), TableStatus::Loading);
        assert_eq!(TableStatus::resolve(false, false, 0), TableStatus::Empty);
        assert_eq!(TableStatus::resolve(false, true, 0), TableStatus::NoResultsForFilter);
        assert_eq!(TableStatus::resolve(false, true, 5), TableStatus::Ready);
        assert_eq!(TableStatus::resolve(false, false, 2), TableStatus::Ready);
    }
}
