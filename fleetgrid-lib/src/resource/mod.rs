//! Client-side model of a server resource collection.
//!
//! A [`ResourceState`] mirrors one resource type (machines, devices, pods)
//! as the server reports it: the items, request flags and the last errors.
//! The table view only reads from it.

mod state;

pub use state::*;

/// A record with a stable primary key.
pub trait Identified {
    /// The primary key type, e.g. a `system_id` string or a numeric id.
    type Id: Ord + Clone;

    /// Returns the primary key.
    fn id(&self) -> Self::Id;
}
