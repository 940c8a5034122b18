//! Sort descriptor and row ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::comparator::{Comparable, ComparatorRegistry};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
    /// Insertion order.
    #[default]
    None,
}

/// The active sort of a table: a key and a direction.
///
/// The direction is [`SortDirection::None`] exactly when there is no key.
///
/// # Example
///
/// ```
/// use fleetgrid_lib::view::{SortDescriptor, SortDirection};
///
/// let sort = SortDescriptor::unsorted()
///     .update_sort("fqdn")
///     .update_sort("fqdn");
/// assert_eq!(sort.key(), Some(&"fqdn"));
/// assert_eq!(sort.direction(), SortDirection::Ascending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDescriptor<K> {
    key: Option<K>,
    direction: SortDirection,
}

impl<K> Default for SortDescriptor<K> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<K> SortDescriptor<K> {
    /// No sort: rows keep their insertion order.
    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::None,
        }
    }

    /// Sorts by `key` in `direction`. A `None` direction drops the key.
    pub fn new(key: K, direction: SortDirection) -> Self {
        match direction {
            SortDirection::None => Self::unsorted(),
            direction => Self {
                key: Some(key),
                direction,
            },
        }
    }

    /// Returns the sort key.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Returns the sort direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Returns `true` if no sort is applied.
    pub fn is_unsorted(&self) -> bool {
        self.key.is_none()
    }
}

impl<K: PartialEq> SortDescriptor<K> {
    /// Returns the descriptor after a header for `key` is activated.
    ///
    /// Activating the current key cycles descending, ascending, unsorted.
    /// Activating any other key starts at descending.
    pub fn update_sort(self, key: K) -> Self {
        if self.key.as_ref() != Some(&key) {
            return Self::new(key, SortDirection::Descending);
        }
        match self.direction {
            SortDirection::Descending => Self::new(key, SortDirection::Ascending),
            SortDirection::Ascending | SortDirection::None => Self::unsorted(),
        }
    }

    /// Returns the direction shown on the header for `key`.
    pub fn direction_for(&self, key: &K) -> SortDirection {
        if self.key.as_ref() == Some(key) {
            self.direction
        } else {
            SortDirection::None
        }
    }
}

/// Orders rows by the descriptor, returning references into `rows`.
///
/// Rows whose comparator yields nothing sort last in either direction; the
/// direction only reverses present values. Equal values keep their original
/// relative order. Keys missing from the registry leave the order unchanged.
pub fn sort_rows<'a, K, R, A>(
    rows: &'a [R],
    descriptor: &SortDescriptor<K>,
    registry: &ComparatorRegistry<K, R, A>,
    aux: Option<&A>,
) -> Vec<&'a R>
where
    K: PartialEq + std::fmt::Debug,
{
    sort_refs(rows.iter().collect(), descriptor, registry, aux)
}

/// Like [`sort_rows`], for rows that were already narrowed to references.
pub fn sort_refs<'a, K, R, A>(
    rows: Vec<&'a R>,
    descriptor: &SortDescriptor<K>,
    registry: &ComparatorRegistry<K, R, A>,
    aux: Option<&A>,
) -> Vec<&'a R>
where
    K: PartialEq + std::fmt::Debug,
{
    let Some(key) = descriptor.key() else {
        return rows;
    };
    let Some(comparator) = registry.get(key) else {
        log::debug!("No comparator registered for {:?}, keeping insertion order", key);
        return rows;
    };

    // Extract once per row rather than once per comparison.
    let mut keyed: Vec<(Option<Comparable>, &'a R)> = rows
        .into_iter()
        .map(|row| {
            let value = comparator(row, aux).filter(|v| !v.is_absent());
            (value, row)
        })
        .collect();

    let descending = descriptor.direction() == SortDirection::Descending;
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.compare(b);
            if descending { ordering.reverse() } else { ordering }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}
