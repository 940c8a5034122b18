//! Search strings and the filters they describe.
//!
//! A search string such as `moon status:(new,!failed) in:selected` is parsed
//! by [`FilterHandlers`] into [`Filters`]. A [`SearchFilter`] then matches
//! [`Searchable`] items against them and plugs into a
//! [`TableView`](crate::view::TableView) as its row filter.

mod filters;
mod matcher;

pub use filters::{FREE_TEXT, FilterHandlers, Filters, PrefixedFilter, SELECTION_FILTER};
pub use matcher::{Attribute, SearchFilter, Searchable};
