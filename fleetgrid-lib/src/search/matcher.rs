//! Matching items against parsed [`Filters`].

use super::filters::{FREE_TEXT, FilterHandlers, Filters, SELECTION_FILTER};
use crate::resource::Identified;
use crate::view::{RowFilter, Selection};

/// A searchable attribute value of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Matched by case-insensitive substring, or equality for `=value`.
    Text(String),
    /// Matched when the value is at least the searched number, or equal for
    /// `=value`. Non-numeric searches compare the number as text.
    Number(f64),
    /// Matched when any element matches as text.
    List(Vec<String>),
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Attribute {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for Attribute {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for Attribute {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<String>> for Attribute {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// An item that can be narrowed by a search string.
///
/// Resource-specific mappings live in the implementation, e.g. a machine
/// answering `ram` from its memory or `zone` from its zone name.
pub trait Searchable {
    /// Value of a named attribute, or `None` if the item has no such attribute.
    fn attribute(&self, name: &str) -> Option<Attribute>;

    /// Values that free-text terms are matched against.
    fn free_text(&self) -> Vec<String>;
}

/// One search value with its modifiers stripped.
#[derive(Debug, Clone, PartialEq)]
struct Term {
    value: String,
    negated: bool,
    exact: bool,
}

impl Term {
    /// Each leading `!` flips negation, so `!!` cancels out. A leading `=`
    /// asks for an exact match.
    fn parse(raw: &str) -> Self {
        let mut rest = raw;
        let mut negated = false;
        let mut exact = false;
        loop {
            if let Some(stripped) = rest.strip_prefix('!') {
                negated = !negated;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix('=') {
                exact = true;
                rest = stripped;
            } else {
                break;
            }
        }
        Self {
            value: rest.to_lowercase(),
            negated,
            exact,
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        if self.exact {
            text == self.value
        } else {
            text.contains(&self.value)
        }
    }

    fn matches(&self, attribute: &Attribute) -> bool {
        match attribute {
            Attribute::Text(text) => self.matches_text(text),
            Attribute::Number(number) => match self.value.parse::<f64>() {
                Ok(wanted) if self.exact => *number == wanted,
                Ok(wanted) => *number >= wanted,
                Err(_) => self.matches_text(&number.to_string()),
            },
            Attribute::List(items) => items.iter().any(|item| self.matches_text(item)),
        }
    }
}

/// Positive terms are alternatives; negative terms must all miss.
fn matches_terms(terms: &[Term], attribute: Option<&Attribute>) -> bool {
    let (negative, positive): (Vec<&Term>, Vec<&Term>) = terms.iter().partition(|t| t.negated);
    let Some(attribute) = attribute else {
        return positive.is_empty();
    };
    let any_positive = positive.is_empty() || positive.iter().any(|t| t.matches(attribute));
    any_positive && !negative.iter().any(|t| t.matches(attribute))
}

/// A [`RowFilter`] driven by a search string.
///
/// Free-text terms must all match. Attribute filters must all match. The
/// `in:selected` filter narrows to the ids in the attached selection.
///
/// # Example
///
/// ```
/// use fleetgrid_lib::resource::Identified;
/// use fleetgrid_lib::search::{Attribute, FilterHandlers, SearchFilter, Searchable};
/// use fleetgrid_lib::view::filter_rows;
///
/// struct Pod { id: u32, name: &'static str, cores: u32 }
///
/// impl Identified for Pod {
///     type Id = u32;
///     fn id(&self) -> u32 { self.id }
/// }
///
/// impl Searchable for Pod {
///     fn attribute(&self, name: &str) -> Option<Attribute> {
///         match name {
///             "name" => Some(self.name.into()),
///             "cores" => Some(self.cores.into()),
///             _ => None,
///         }
///     }
///     fn free_text(&self) -> Vec<String> { vec![self.name.to_string()] }
/// }
///
/// let pods = [
///     Pod { id: 1, name: "lxd-1", cores: 8 },
///     Pod { id: 2, name: "virsh-1", cores: 16 },
/// ];
/// let filter: SearchFilter<u32> = SearchFilter::parse(&FilterHandlers::default(), "cores:12");
/// let matched = filter_rows(&pods, &filter);
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].id, 2);
/// ```
#[derive(Debug, Clone)]
pub struct SearchFilter<'s, K: Ord + Clone> {
    filters: Filters,
    free: Vec<Term>,
    attributes: Vec<(String, Vec<Term>)>,
    selection: Option<&'s Selection<K>>,
}

impl<'s, K: Ord + Clone> SearchFilter<'s, K> {
    /// Creates a filter from parsed filters.
    pub fn new(filters: Filters) -> Self {
        let mut free = Vec::new();
        let mut attributes = Vec::new();
        for (name, values) in filters.iter() {
            let terms: Vec<Term> = values.iter().map(|v| Term::parse(v)).collect();
            if name == FREE_TEXT {
                free = terms;
            } else if !terms.is_empty() {
                attributes.push((name.to_string(), terms));
            }
        }
        Self {
            filters,
            free,
            attributes,
            selection: None,
        }
    }

    /// Parses `search` with `handlers` and creates a filter from it.
    pub fn parse(handlers: &FilterHandlers, search: &str) -> Self {
        Self::new(handlers.current_filters(search))
    }

    /// Attaches the selection consulted by `in:selected`.
    pub fn with_selection(mut self, selection: &'s Selection<K>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Returns the parsed filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    fn selection_attribute(&self, id: &K) -> Attribute {
        let selected = self.selection.is_some_and(|s| s.contains(id));
        Attribute::Text(if selected { "selected" } else { "" }.to_string())
    }
}

impl<K, R> RowFilter<R> for SearchFilter<'_, K>
where
    K: Ord + Clone,
    R: Searchable + Identified<Id = K>,
{
    fn matches(&self, row: &R) -> bool {
        if !self.free.is_empty() {
            let text = row.free_text();
            let all_free = self.free.iter().all(|term| {
                let hit = text.iter().any(|value| term.matches_text(value));
                hit != term.negated
            });
            if !all_free {
                return false;
            }
        }

        self.attributes.iter().all(|(name, terms)| {
            let attribute = if name == SELECTION_FILTER {
                Some(self.selection_attribute(&row.id()))
            } else {
                row.attribute(name)
            };
            matches_terms(terms, attribute.as_ref())
        })
    }

    fn is_active(&self) -> bool {
        !self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_modifiers() {
        assert_eq!(
            Term::parse("!=Deploying"),
            Term { value: "deploying".into(), negated: true, exact: true }
        );
        assert!(!Term::parse("!!first").negated);
        assert!(Term::parse("=!pending").negated);
    }

    #[test]
    fn test_number_attributes() {
        let at_least = Term::parse("3");
        assert!(at_least.matches(&Attribute::Number(4.0)));
        assert!(!at_least.matches(&Attribute::Number(2.0)));
        assert!(Term::parse("1.5").matches(&Attribute::Number(2.2)));
        assert!(Term::parse("=1").matches(&Attribute::Number(1.0)));
        assert!(!Term::parse("=1").matches(&Attribute::Number(2.0)));
    }

    #[test]
    fn test_missing_attribute() {
        let positive = [Term::parse("a")];
        let negative = [Term::parse("!a")];
        assert!(!matches_terms(&positive, None));
        assert!(matches_terms(&negative, None));
    }
}
