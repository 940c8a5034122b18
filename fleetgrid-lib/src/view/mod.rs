//! Tabular collection view model.
//!
//! Rows flow from the resource store through a [`RowFilter`], are ordered by
//! the [`SortDescriptor`] using the [`ComparatorRegistry`], and are sliced by
//! [`Pagination`]. The [`Selection`] is tracked by id across the whole
//! collection, independent of filtering and sorting. [`TableView`] composes
//! the pieces; each is also usable on its own.
//!
//! # Example
//!
//! ```
//! use fleetgrid_lib::resource::Identified;
//! use fleetgrid_lib::view::{Column, NoFilter, TableStatus, TableView};
//!
//! struct Device { id: u32, fqdn: String }
//!
//! impl Identified for Device {
//!     type Id = u32;
//!     fn id(&self) -> u32 { self.id }
//! }
//!
//! let columns: Vec<Column<&str, Device>> = vec![
//!     Column::new("FQDN").sort_by("fqdn", |d: &Device, _| Some(d.fqdn.as_str().into())),
//! ];
//! let mut view = TableView::new(columns).unwrap();
//! view.update_sort("fqdn").unwrap();
//!
//! let devices = vec![
//!     Device { id: 1, fqdn: "a.maas".into() },
//!     Device { id: 2, fqdn: "b.maas".into() },
//! ];
//! let window = view.render(&devices, false, &NoFilter, None);
//! assert_eq!(window.status, TableStatus::Ready);
//! assert_eq!(window.visible_ids, vec![2, 1]);
//! ```

mod comparator;
mod filter;
mod page;
mod selection;
mod sort;
mod status;
mod table;

pub use comparator::{Column, Comparable, Comparator, ComparatorRegistry};
pub use filter::{FuzzyFilter, NoFilter, QueryPredicate, RowFilter, filter_rows};
pub use page::{Pagination, get_page, total_pages};
pub use selection::{CheckState, Selection};
pub use sort::{SortDescriptor, SortDirection, sort_refs, sort_rows};
pub use status::TableStatus;
pub use table::{TableView, TableWindow};
