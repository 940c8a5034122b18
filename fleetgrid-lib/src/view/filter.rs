//! Row filters applied before sorting and pagination.

use std::cell::RefCell;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Narrows the rows a table displays.
pub trait RowFilter<R> {
    /// Returns `true` if the row should be displayed.
    fn matches(&self, row: &R) -> bool;

    /// Returns `true` if the filter narrows anything. Drives the
    /// empty/no-results distinction of [`TableStatus`](super::TableStatus).
    fn is_active(&self) -> bool;
}

/// Applies `filter` to `rows`, keeping their order.
pub fn filter_rows<'a, R, F>(rows: &'a [R], filter: &F) -> Vec<&'a R>
where
    F: RowFilter<R> + ?Sized,
{
    if !filter.is_active() {
        return rows.iter().collect();
    }
    rows.iter().filter(|row| filter.matches(row)).collect()
}

/// Shows every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl<R> RowFilter<R> for NoFilter {
    fn matches(&self, _row: &R) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Adapts a `(row, query) -> bool` function into a [`RowFilter`].
///
/// A blank query matches every row without calling the function. Case
/// handling is up to the function.
///
/// # Example
///
/// ```
/// use fleetgrid_lib::view::{filter_rows, QueryPredicate};
///
/// let hosts = ["alpha", "beta", "Alphard"];
/// let filter = QueryPredicate::new("alph", |host: &&str, query: &str| {
///     host.to_lowercase().contains(&query.to_lowercase())
/// });
/// assert_eq!(filter_rows(&hosts, &filter), vec![&"alpha", &"Alphard"]);
/// ```
pub struct QueryPredicate<F> {
    query: String,
    predicate: F,
}

impl<F> QueryPredicate<F> {
    /// Creates a predicate for `query`.
    pub fn new(query: impl Into<String>, predicate: F) -> Self {
        Self {
            query: query.into(),
            predicate,
        }
    }

    /// Returns the query.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl<R, F> RowFilter<R> for QueryPredicate<F>
where
    F: Fn(&R, &str) -> bool,
{
    fn matches(&self, row: &R) -> bool {
        !self.is_active() || (self.predicate)(row, &self.query)
    }

    fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Fuzzy, case-insensitive matching of the query against a row label.
pub struct FuzzyFilter<F> {
    pattern: Option<Pattern>,
    matcher: RefCell<Matcher>,
    label: F,
}

impl<F> FuzzyFilter<F> {
    /// Creates a fuzzy filter. `label` renders the text matched for each row.
    pub fn new(query: &str, label: F) -> Self {
        let query = query.trim();
        let pattern = (!query.is_empty()).then(|| {
            Pattern::new(
                query,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            )
        });
        Self {
            pattern,
            matcher: RefCell::new(Matcher::new(Config::DEFAULT)),
            label,
        }
    }

    /// Match score for a row; higher is better. `None` if it does not match.
    pub fn score<R>(&self, row: &R) -> Option<u32>
    where
        F: Fn(&R) -> String,
    {
        let Some(pattern) = &self.pattern else {
            return Some(0);
        };
        let label = (self.label)(row);
        let mut buf = Vec::new();
        let haystack = Utf32Str::new(&label, &mut buf);
        pattern.score(haystack, &mut self.matcher.borrow_mut())
    }
}

impl<R, F> RowFilter<R> for FuzzyFilter<F>
where
    F: Fn(&R) -> String,
{
    fn matches(&self, row: &R) -> bool {
        self.score(row).is_some()
    }

    fn is_active(&self) -> bool {
        self.pattern.is_some()
    }
}
