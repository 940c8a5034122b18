//! Fleet table view model
//!
//! Sorting, selection, filtering and pagination for resource lists in a
//! fleet management console (machines, devices, controllers, pods), plus
//! the search grammar and resource store model that feed them.

pub mod bulk;
pub mod error;
pub mod resource;
pub mod search;
pub mod view;

mod config;

pub use config::ViewConfig;
