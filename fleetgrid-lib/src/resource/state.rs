//! Resource collection state and its reducers.

use serde::{Deserialize, Serialize};

use super::Identified;
use crate::error::ResourceErrors;

/// State of one resource collection.
///
/// Every request goes through a start, success and error step. Reads set
/// `loading`; writes set `saving` and report `saved` on success. Server push
/// notifications (`*_notify`) keep `items` in sync between fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState<T, E = ResourceErrors> {
    /// The items as last reported by the server.
    pub items: Vec<T>,
    /// A read request is in flight.
    pub loading: bool,
    /// The collection has been fetched at least once.
    pub loaded: bool,
    /// A write request is in flight.
    pub saving: bool,
    /// The last write request succeeded.
    pub saved: bool,
    /// Errors from the last failed request.
    pub errors: Option<E>,
}

impl<T, E> Default for ResourceState<T, E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            saving: false,
            saved: false,
            errors: None,
        }
    }
}

impl<T: Identified, E> ResourceState<T, E> {
    /// Creates an empty, unloaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Finds an item by primary key.
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| &item.id() == id)
    }

    /// Primary keys of every item, in order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Identified::id).collect()
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| &item.id() == id)
    }

    fn upsert(&mut self, item: T) {
        match self.position(&item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    fn write_start(&mut self) {
        self.saved = false;
        self.saving = true;
    }

    fn write_success(&mut self) {
        self.errors = None;
        self.saved = true;
        self.saving = false;
    }

    fn write_error(&mut self, errors: E) {
        self.errors = Some(errors);
        self.saving = false;
    }

    /// A list request was sent.
    pub fn fetch_start(&mut self) {
        self.loading = true;
    }

    /// Replaces the items with a fetched list.
    pub fn fetch_success(&mut self, items: Vec<T>) {
        self.loading = false;
        self.loaded = true;
        self.items = items;
    }

    /// Records a failed list request.
    pub fn fetch_error(&mut self, errors: E) {
        self.errors = Some(errors);
        self.loading = false;
    }

    /// A single-item request was sent.
    pub fn get_start(&mut self) {
        self.loading = true;
    }

    /// Stores a single fetched item, replacing any item with the same key.
    pub fn get_success(&mut self, item: T) {
        self.upsert(item);
        self.loading = false;
        self.saving = false;
    }

    /// Records a failed single-item request.
    pub fn get_error(&mut self, errors: E) {
        self.errors = Some(errors);
        self.loading = false;
        self.saving = false;
    }

    /// A create request was sent.
    pub fn create_start(&mut self) {
        self.write_start();
    }

    /// Marks the create as saved. The item itself arrives through [`ResourceState::create_notify`].
    pub fn create_success(&mut self) {
        self.write_success();
    }

    /// Records a failed create request.
    pub fn create_error(&mut self, errors: E) {
        self.write_error(errors);
    }

    /// Adds a created item. The server can announce an item that already
    /// exists, so an item with the same key is replaced rather than duplicated.
    pub fn create_notify(&mut self, item: T) {
        self.upsert(item);
    }

    /// An update request was sent.
    pub fn update_start(&mut self) {
        self.write_start();
    }

    /// Marks the update as saved.
    pub fn update_success(&mut self) {
        self.write_success();
    }

    /// Records a failed update request.
    pub fn update_error(&mut self, errors: E) {
        self.write_error(errors);
    }

    /// Replaces the item with the same key. Unknown items are ignored.
    pub fn update_notify(&mut self, item: T) {
        if let Some(index) = self.position(&item.id()) {
            self.items[index] = item;
        }
    }

    /// A delete request was sent.
    pub fn delete_start(&mut self) {
        self.write_start();
    }

    /// Marks the delete as saved.
    pub fn delete_success(&mut self) {
        self.write_success();
    }

    /// Records a failed delete request.
    pub fn delete_error(&mut self, errors: E) {
        self.write_error(errors);
    }

    /// Removes the item with `id`. Unknown ids are ignored.
    pub fn delete_notify(&mut self, id: &T::Id) {
        if let Some(index) = self.position(id) {
            self.items.remove(index);
        }
    }

    /// Clears errors and write flags, e.g. when a form is closed.
    pub fn cleanup(&mut self) {
        self.errors = None;
        self.saved = false;
        self.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Zone {
        id: u32,
        name: &'static str,
    }

    impl Identified for Zone {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn zone(id: u32, name: &'static str) -> Zone {
        Zone { id, name }
    }

    #[test]
    fn test_fetch_cycle() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.fetch_start();
        assert!(state.loading);
        state.fetch_success(vec![zone(1, "default")]);
        assert!(!state.loading);
        assert!(state.loaded);
        assert_eq!(state.items(), &[zone(1, "default")]);
    }

    #[test]
    fn test_fetch_error() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.fetch_start();
        state.fetch_error("Unable to list zones".into());
        assert!(!state.loading);
        assert!(!state.loaded);
        assert_eq!(state.errors, Some(ResourceErrors::from("Unable to list zones")));
    }

    #[test]
    fn test_write_cycle() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.update_start();
        assert!(state.saving);
        assert!(!state.saved);
        state.update_error("Name taken".into());
        assert!(!state.saving);
        state.update_start();
        state.update_success();
        assert!(state.saved);
        assert!(state.errors.is_none());
        state.cleanup();
        assert!(!state.saved);
    }

    #[test]
    fn test_create_notify_does_not_duplicate() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.fetch_success(vec![zone(1, "default")]);
        state.create_notify(zone(1, "renamed"));
        state.create_notify(zone(2, "edge"));
        assert_eq!(state.items(), &[zone(1, "renamed"), zone(2, "edge")]);
    }

    #[test]
    fn test_update_and_delete_notify() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.fetch_success(vec![zone(1, "a"), zone(2, "b")]);
        state.update_notify(zone(2, "c"));
        state.update_notify(zone(3, "ignored"));
        assert_eq!(state.items(), &[zone(1, "a"), zone(2, "c")]);

        state.delete_notify(&1);
        state.delete_notify(&42);
        assert_eq!(state.ids(), vec![2]);
        assert_eq!(state.find(&2).map(|z| z.name), Some("c"));
    }

    #[test]
    fn test_get_success_upserts() {
        let mut state: ResourceState<Zone> = ResourceState::new();
        state.get_start();
        state.get_success(zone(5, "new"));
        assert!(!state.loading);
        assert_eq!(state.ids(), vec![5]);
    }
}
