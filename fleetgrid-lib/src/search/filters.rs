//! Search string grammar.
//!
//! A search string mixes free text with attribute filters:
//!
//! ```text
//! web !staging status:(new,failed testing) tags:!(gpu) zone:default
//! ```
//!
//! Attribute values may be wrapped in parens (required when they contain
//! spaces), negated individually with `!`, negated as a group with `!(..)`,
//! and matched exactly with `=`.

use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

/// Name of the free-text entry in [`Filters`].
pub const FREE_TEXT: &str = "q";

/// Name of the selection filter (`in:selected`). Never persisted to URLs.
pub const SELECTION_FILTER: &str = "in";

// A `name:(...)` group (which may contain spaces), otherwise any run of
// non-space characters starting with a word character.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\b[\w-]+:!*\([^)]+\))|(!*\w+\S*)").expect("search token pattern is valid")
});

/// Parsed search: filter names mapped to their values, in insertion order.
///
/// The free-text entry [`FREE_TEXT`] is always present and always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            entries: vec![(FREE_TEXT.to_string(), Vec::new())],
        }
    }
}

impl Filters {
    /// Creates filters with no free text and no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds filters from `(name, values)` pairs.
    pub fn from_entries<N, V, I>(entries: I) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (N, Vec<V>)>,
    {
        let mut filters = Self::new();
        for (name, values) in entries {
            filters.set(name, values.into_iter().map(Into::into).collect());
        }
        filters
    }

    /// Returns the values of a filter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    /// Sets the values of a filter, keeping its position if it exists.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = values,
            None => self.entries.push((name, values)),
        }
    }

    /// Removes a filter and returns its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if the filter name is present (even with no values).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Free-text terms.
    pub fn free_text(&self) -> &[String] {
        self.get(FREE_TEXT).unwrap_or(&[])
    }

    /// Appends a free-text term.
    pub fn push_free_text(&mut self, term: impl Into<String>) {
        match self.get_mut(FREE_TEXT) {
            Some(terms) => terms.push(term.into()),
            None => self.entries.insert(0, (FREE_TEXT.to_string(), vec![term.into()])),
        }
    }

    /// Iterates over `(name, values)` in order, free text included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns `true` if no filter has any value.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, values)| values.is_empty())
    }
}

/// A filter whose values are stored as separate keys, e.g. the `workload`
/// filter stores annotation `team` as the key `workload-team`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedFilter {
    /// The filter name used when toggling, e.g. `workload`.
    pub filter: String,
    /// The key prefix, e.g. `workload`.
    pub prefix: String,
}

impl PrefixedFilter {
    pub fn new(filter: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            prefix: prefix.into(),
        }
    }

    fn key_for(&self, value: &str) -> String {
        if self.owns_key(value) {
            value.to_string()
        } else {
            format!("{}-{}", self.prefix, value)
        }
    }

    fn owns_key(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Converts between search strings, [`Filters`] and URL query strings.
#[derive(Debug, Clone, Default)]
pub struct FilterHandlers {
    prefixed: Vec<PrefixedFilter>,
}

impl FilterHandlers {
    /// Creates handlers that know about the given prefixed filters.
    pub fn new(prefixed: Vec<PrefixedFilter>) -> Self {
        Self { prefixed }
    }

    fn prefixed_filter(&self, name: &str) -> Option<&PrefixedFilter> {
        self.prefixed.iter().find(|p| p.filter == name)
    }

    fn is_prefixed_key(&self, key: &str) -> bool {
        self.prefixed.iter().any(|p| p.owns_key(key))
    }

    /// Parses a search string.
    ///
    /// Malformed attribute tokens (unbalanced parens, no values) are dropped
    /// rather than reported, so a half-typed search still filters.
    pub fn current_filters(&self, search: &str) -> Filters {
        let mut filters = Filters::new();
        for token in TOKEN.find_iter(search).map(|m| m.as_str()) {
            match token.split_once(':').filter(|(_, values)| !values.is_empty()) {
                Some((name, values)) => self.add_attribute(&mut filters, name, values),
                None if self.is_prefixed_key(token) => filters.set(token, vec![String::new()]),
                None if !token.contains(':') => filters.push_free_text(token),
                None => {}
            }
        }
        filters
    }

    fn add_attribute(&self, filters: &mut Filters, name: &str, values: &str) {
        let (values, negate_all) = if values.starts_with("!(") {
            (&values[1..], true)
        } else if values.starts_with("!!(") {
            (&values[2..], false)
        } else {
            (values, false)
        };
        if values.starts_with('(') != values.ends_with(')') {
            return;
        }

        let inner = values
            .split(['(', ')', '|', '^'])
            .find(|part| !part.is_empty());
        match inner {
            Some(inner) => {
                let list = inner
                    .split(',')
                    .map(|value| {
                        if negate_all {
                            format!("!{}", value)
                        } else {
                            value.to_string()
                        }
                    })
                    .collect();
                filters.set(name, list);
            }
            // Empty parens only mean something for prefixed keys, where they
            // match any item carrying the key.
            None if self.is_prefixed_key(name) => filters.set(name, vec![String::new()]),
            None => {}
        }
    }

    /// Renders filters back into a search string: free text first, then
    /// `name:(a,b)` for every filter with values.
    pub fn to_search_string(&self, filters: &Filters) -> String {
        let mut search = filters.free_text().join(" ");
        for (name, values) in filters.iter() {
            if name == FREE_TEXT || values.is_empty() {
                continue;
            }
            search.push_str(&format!(" {}:({})", name, values.join(",")));
        }
        search.trim().to_string()
    }

    /// Whether `value` is set for filter `name`, ignoring case.
    ///
    /// With `exact`, looks for the exact-match form `=value`. For prefixed
    /// filters, checks whether the key for `value` exists.
    pub fn is_filter_active(&self, filters: Option<&Filters>, name: &str, value: &str, exact: bool) -> bool {
        let Some(filters) = filters else {
            return false;
        };
        if let Some(prefixed) = self.prefixed_filter(name) {
            return filters.contains(&prefixed.key_for(value));
        }
        let value = if exact { format!("={}", value) } else { value.to_string() };
        filters
            .get(name)
            .is_some_and(|values| value_index(values, &value).is_some())
    }

    /// Adds or removes `value` for filter `name` and returns the new filters.
    ///
    /// `should_exist` forces the outcome: `Some(true)` only adds, `Some(false)`
    /// only removes. A filter left without values is removed.
    pub fn toggle_filter(
        &self,
        filters: &Filters,
        name: &str,
        value: &str,
        exact: bool,
        should_exist: Option<bool>,
    ) -> Filters {
        if let Some(prefixed) = self.prefixed_filter(name) {
            return self.toggle_prefixed(filters, prefixed, value, should_exist);
        }

        let mut next = filters.clone();
        let value = if exact { format!("={}", value) } else { value.to_string() };
        let index = filters.get(name).and_then(|values| value_index(values, &value));
        match index {
            None if should_exist.unwrap_or(true) => match next.get_mut(name) {
                Some(values) => values.push(value),
                None => next.set(name, vec![value]),
            },
            Some(index) if !should_exist.unwrap_or(false) => {
                if let Some(values) = next.get_mut(name) {
                    values.remove(index);
                    if values.is_empty() {
                        next.remove(name);
                    }
                }
            }
            _ => {}
        }
        next
    }

    fn toggle_prefixed(
        &self,
        filters: &Filters,
        prefixed: &PrefixedFilter,
        value: &str,
        should_exist: Option<bool>,
    ) -> Filters {
        let key = prefixed.key_for(value);
        let exists = filters.contains(&key);
        let keep = should_exist.unwrap_or(!exists);
        let mut next = filters.clone();
        match (exists, keep) {
            (false, true) => next.set(key, vec![String::new()]),
            (true, false) => {
                next.remove(&key);
            }
            _ => {}
        }
        next
    }

    /// Reads filters from a URL query string such as `?status=new,deployed`.
    pub fn from_query_string(&self, query: &str) -> Filters {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filters = Filters::new();
        for (name, values) in form_urlencoded::parse(query.as_bytes()) {
            if values.is_empty() {
                continue;
            }
            filters.set(name, values.split(',').map(String::from).collect());
        }
        filters
    }

    /// Writes filters to a URL query string. Empty filters and the
    /// selection filter are left out.
    pub fn to_query_string(&self, filters: &Filters) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, values) in filters.iter() {
            if values.is_empty() || name == SELECTION_FILTER {
                continue;
            }
            serializer.append_pair(name, &values.join(","));
        }
        format!("?{}", serializer.finish())
    }
}

fn value_index(values: &[String], value: &str) -> Option<usize> {
    let value = value.to_lowercase();
    values.iter().position(|v| v.to_lowercase() == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handlers() -> FilterHandlers {
        FilterHandlers::new(vec![PrefixedFilter::new("koala_filter", "koala")])
    }

    fn filters(entries: &[(&str, &[&str])]) -> Filters {
        Filters::from_entries(entries.iter().map(|(name, values)| (*name, values.to_vec())))
    }

    #[test]
    fn test_empty_search() {
        assert_eq!(handlers().current_filters(""), Filters::new());
        assert!(Filters::new().is_empty());
    }

    #[test]
    fn test_free_text() {
        assert_eq!(handlers().current_filters("moon !sun"), filters(&[("q", &["moon", "!sun"])]));
        assert_eq!(handlers().current_filters("1moon"), filters(&[("q", &["1moon"])]));
    }

    #[test]
    fn test_attribute_with_spaces() {
        let parsed = handlers().current_filters("moon status:(new,failed disk erasing) star");
        assert_eq!(
            parsed,
            filters(&[("q", &["moon", "star"]), ("status", &["new", "failed disk erasing"])])
        );
        assert_eq!(
            handlers().to_search_string(&parsed),
            "moon star status:(new,failed disk erasing)"
        );
    }

    #[test]
    fn test_group_negation() {
        let parsed = handlers().current_filters("moon status:!(!new,failed disk erasing)");
        assert_eq!(parsed.get("status"), Some(&["!!new".to_string(), "!failed disk erasing".to_string()][..]));

        let parsed = handlers().current_filters("moon status:!!(!new)");
        assert_eq!(handlers().to_search_string(&parsed), "moon status:(!new)");
    }

    #[test]
    fn test_values_without_parens_stop_at_space() {
        let parsed = handlers().current_filters("moon status:new,failed disk erasing");
        assert_eq!(handlers().to_search_string(&parsed), "moon disk erasing status:(new,failed)");
    }

    #[test]
    fn test_malformed_tokens_are_dropped() {
        let h = handlers();
        assert_eq!(h.to_search_string(&h.current_filters("moon status:(new,failed disk erasing")), "moon disk erasing");
        assert_eq!(h.to_search_string(&h.current_filters("moon status:(")), "moon");
        assert_eq!(h.to_search_string(&h.current_filters("moon status:")), "moon");
        assert!(h.current_filters("hostname:(=").is_empty());
    }

    #[test]
    fn test_values_containing_colons() {
        let parsed = handlers().current_filters("moon mac:28:76:03:77:5a:b5 status:new");
        assert_eq!(
            handlers().to_search_string(&parsed),
            "moon mac:(28:76:03:77:5a:b5) status:(new)"
        );
    }

    #[test]
    fn test_prefixed_keys() {
        let h = handlers();
        assert_eq!(h.current_filters("koala-type:()"), filters(&[("koala-type", &[""])]));
        assert_eq!(h.current_filters("koala-type"), filters(&[("koala-type", &[""])]));
        assert_eq!(
            h.current_filters("free-text koala-type:(qwerty) koala-service:(dvorak)"),
            filters(&[("q", &["free-text"]), ("koala-type", &["qwerty"]), ("koala-service", &["dvorak"])])
        );
    }

    #[test]
    fn test_is_filter_active() {
        let h = handlers();
        assert!(!h.is_filter_active(None, "type", "invalid", false));
        assert!(!h.is_filter_active(Some(&filters(&[("type", &["not"])])), "type", "invalid", false));
        assert!(h.is_filter_active(Some(&filters(&[("type", &["valid"])])), "type", "valid", false));
        assert!(!h.is_filter_active(Some(&filters(&[("type", &["valid"])])), "type", "valid", true));
        assert!(h.is_filter_active(Some(&filters(&[("type", &["=Valid"])])), "type", "valid", true));
        assert!(h.is_filter_active(
            Some(&filters(&[("koala-type", &["production"])])),
            "koala_filter",
            "type",
            false
        ));
    }

    #[test]
    fn test_toggle_filter() {
        let h = handlers();
        let added = h.toggle_filter(&Filters::new(), "type", "value", false, None);
        assert_eq!(added, filters(&[("type", &["value"])]));

        let exact = h.toggle_filter(&filters(&[("type", &["exists"])]), "type", "value", true, None);
        assert_eq!(exact, filters(&[("type", &["exists", "=value"])]));

        let removed = h.toggle_filter(&filters(&[("type", &["exists", "=Value"])]), "type", "value", true, None);
        assert_eq!(removed, filters(&[("type", &["exists"])]));

        let emptied = h.toggle_filter(&filters(&[("type", &["value"])]), "type", "value", false, None);
        assert!(!emptied.contains("type"));
    }

    #[test]
    fn test_toggle_filter_should_exist() {
        let h = handlers();
        let present = filters(&[("type", &["value"])]);
        assert_eq!(h.toggle_filter(&present, "type", "value", false, Some(true)), present);
        assert_eq!(h.toggle_filter(&Filters::new(), "type", "value", false, Some(false)), Filters::new());
        assert_eq!(h.toggle_filter(&Filters::new(), "type", "value", false, Some(true)), present);
    }

    #[test]
    fn test_toggle_prefixed_filter() {
        let h = handlers();
        let added = h.toggle_filter(&Filters::new(), "koala_filter", "value", false, None);
        assert_eq!(added, filters(&[("koala-value", &[""])]));

        let with_value = filters(&[("koala-value", &["cuddly"])]);
        assert_eq!(h.toggle_filter(&with_value, "koala_filter", "koala-value", false, None), Filters::new());

        let existing = filters(&[("koala-value", &[""])]);
        assert_eq!(h.toggle_filter(&existing, "koala_filter", "koala-value", false, Some(true)), existing);
    }

    #[test]
    fn test_query_string() {
        let h = handlers();
        let parsed = h.current_filters("moon status:(new,failed testing) in:selected");
        assert_eq!(h.to_query_string(&parsed), "?q=moon&status=new%2Cfailed+testing");

        let restored = h.from_query_string("?q=moon&status=new%2Cfailed+testing&empty=");
        assert_eq!(restored, filters(&[("q", &["moon"]), ("status", &["new", "failed testing"])]));
    }
}
