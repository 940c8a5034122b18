//! Column definitions and the comparator registry.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::ViewError;

/// A value a comparator can reduce a row to.
///
/// Composite fields must be reduced by the comparator to one of these before
/// returning. Integers and numbers compare numerically with each other;
/// otherwise values of different variants order `Bool < Integer/Number < Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    /// Boolean value (`false < true`).
    Bool(bool),
    /// Integer value, compared exactly at any magnitude.
    Integer(i128),
    /// Floating point value, compared numerically. `NaN` is treated as absent.
    Number(f64),
    /// Text value, compared ordinally by bytes with no locale collation.
    Text(String),
}

impl Comparable {
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Integer(_) | Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    /// Returns `true` for values that sort as if the comparator returned `None`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_nan())
    }

    /// Total order over present values.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Integer(a), Self::Number(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Number(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.as_str().cmp(b.as_str()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<bool> for Comparable {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Comparable {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Comparable {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Comparable {
    fn from(value: i32) -> Self {
        Self::Integer(value as i128)
    }
}

impl From<i64> for Comparable {
    fn from(value: i64) -> Self {
        Self::Integer(value as i128)
    }
}

impl From<u32> for Comparable {
    fn from(value: u32) -> Self {
        Self::Integer(value as i128)
    }
}

impl From<u64> for Comparable {
    fn from(value: u64) -> Self {
        Self::Integer(value as i128)
    }
}

impl From<usize> for Comparable {
    fn from(value: usize) -> Self {
        Self::Integer(value as i128)
    }
}

impl From<&str> for Comparable {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Comparable {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Extracts a comparable value from a row, with optional auxiliary data
/// (lookup tables the row only references by id, for example).
pub type Comparator<R, A = ()> = Arc<dyn Fn(&R, Option<&A>) -> Option<Comparable> + Send + Sync>;

/// A single column of a table: header label plus an optional sort key and
/// the comparator that key sorts by.
pub struct Column<K, R, A = ()> {
    header: String,
    sort: Option<(K, Comparator<R, A>)>,
}

impl<K, R, A> Column<K, R, A> {
    /// Creates an unsortable column.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sort: None,
        }
    }

    /// Makes the column sortable by `key` using `comparator`.
    pub fn sort_by<F>(mut self, key: K, comparator: F) -> Self
    where
        F: Fn(&R, Option<&A>) -> Option<Comparable> + Send + Sync + 'static,
    {
        self.sort = Some((key, Arc::new(comparator)));
        self
    }

    /// Returns the header label.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the sort key, if the column is sortable.
    pub fn sort_key(&self) -> Option<&K> {
        self.sort.as_ref().map(|(key, _)| key)
    }
}

impl<K: Clone, R, A> Clone for Column<K, R, A> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<K: fmt::Debug, R, A> fmt::Debug for Column<K, R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("sort_key", &self.sort_key())
            .finish()
    }
}

/// Maps sort keys to comparators.
///
/// Keys are a per-table type parameter, usually a small enum, so invalid keys
/// are ruled out when the columns are defined. Tables have few columns and
/// lookups are linear.
pub struct ComparatorRegistry<K, R, A = ()> {
    entries: Vec<(K, Comparator<R, A>)>,
}

impl<K, R, A> Default for ComparatorRegistry<K, R, A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq + fmt::Debug, R, A> ComparatorRegistry<K, R, A> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a comparator, rejecting keys that are already present.
    pub fn register<F>(&mut self, key: K, comparator: F) -> Result<(), ViewError>
    where
        F: Fn(&R, Option<&A>) -> Option<Comparable> + Send + Sync + 'static,
    {
        self.insert(key, Arc::new(comparator))
    }

    fn insert(&mut self, key: K, comparator: Comparator<R, A>) -> Result<(), ViewError> {
        if self.contains(&key) {
            return Err(ViewError::duplicate_sort_key(&key));
        }
        self.entries.push((key, comparator));
        Ok(())
    }

    /// Builds a registry from the sortable columns of a column set.
    pub fn from_columns(columns: &[Column<K, R, A>]) -> Result<Self, ViewError>
    where
        K: Clone,
    {
        let mut registry = Self::new();
        for (key, comparator) in columns.iter().filter_map(|c| c.sort.as_ref()) {
            registry.insert(key.clone(), Arc::clone(comparator))?;
        }
        Ok(registry)
    }

    /// Returns the comparator for a key.
    pub fn get(&self, key: &K) -> Option<&Comparator<R, A>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, comparator)| comparator)
    }

    /// Returns `true` if the key is registered.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns the registered keys in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }
}

impl<K: fmt::Debug, R, A> fmt::Debug for ComparatorRegistry<K, R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, _)| key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Key {
        Name,
        Cores,
    }

    struct Row {
        name: &'static str,
        cores: u32,
    }

    #[test]
    fn test_mixed_variants_have_fixed_order() {
        let text = Comparable::from("a");
        let number = Comparable::from(10);
        let flag = Comparable::from(true);
        assert_eq!(flag.compare(&number), Ordering::Less);
        assert_eq!(number.compare(&text), Ordering::Less);
    }

    #[test]
    fn test_text_is_ordinal() {
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(
            Comparable::from("Zulu").compare(&Comparable::from("alpha")),
            Ordering::Less
        );
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            Comparable::from(9).compare(&Comparable::from(10)),
            Ordering::Less
        );
        assert!(Comparable::Number(f64::NAN).is_absent());
    }

    #[test]
    fn test_large_integers_stay_distinct() {
        let base = 1u64 << 60;
        assert_eq!(
            Comparable::from(base).compare(&Comparable::from(base + 1)),
            Ordering::Less
        );
        assert_eq!(
            Comparable::from(u64::MAX).compare(&Comparable::from(u64::MAX - 1)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_integers_and_floats_compare_numerically() {
        assert_eq!(
            Comparable::from(2).compare(&Comparable::from(2.5)),
            Ordering::Less
        );
        assert_eq!(
            Comparable::from(3.0).compare(&Comparable::from(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_registry_from_columns() {
        let columns: Vec<Column<Key, Row>> = vec![
            Column::new("Name").sort_by(Key::Name, |r: &Row, _| Some(r.name.into())),
            Column::new("Actions"),
            Column::new("Cores").sort_by(Key::Cores, |r: &Row, _| Some(r.cores.into())),
        ];
        let registry = ComparatorRegistry::from_columns(&columns).unwrap();
        assert_eq!(registry.keys().copied().collect::<Vec<_>>(), vec![Key::Name, Key::Cores]);

        let row = Row { name: "pod", cores: 4 };
        let comparator = registry.get(&Key::Cores).unwrap();
        assert_eq!(comparator(&row, None), Some(Comparable::Integer(4)));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let columns: Vec<Column<Key, Row>> = vec![
            Column::new("Name").sort_by(Key::Name, |r: &Row, _| Some(r.name.into())),
            Column::new("Hostname").sort_by(Key::Name, |r: &Row, _| Some(r.name.into())),
        ];
        let err = ComparatorRegistry::from_columns(&columns).unwrap_err();
        assert!(matches!(err, ViewError::DuplicateSortKey { .. }));
    }
}
