//! Row selection by id.

use std::collections::BTreeSet;

use crate::bulk::BulkAction;

/// State of a "select all" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Every visible row is selected.
    Checked,
    /// Some, but not all, visible rows are selected.
    Indeterminate,
    /// No visible row is selected.
    Unchecked,
}

/// The set of selected row ids.
///
/// Operations return a new selection instead of mutating, so callers can
/// detect changes by comparison. Ids are kept even when their rows are
/// filtered out or disappear from the collection; use [`Selection::prune`]
/// to drop them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Ord + Clone> {
    selected: BTreeSet<K>,
}

impl<K: Ord + Clone> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> FromIterator<K> for Selection<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

impl<K: Ord + Clone> Selection<K> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    /// Adds `key` if absent, removes it if present.
    pub fn toggle_one(&self, key: &K) -> Self {
        let mut next = self.clone();
        if !next.selected.remove(key) {
            next.selected.insert(key.clone());
        }
        next
    }

    /// Removes every visible key if all are selected, otherwise adds them all.
    ///
    /// Keys outside `visible` are left alone.
    pub fn toggle_all(&self, visible: &[K]) -> Self {
        let mut next = self.clone();
        if visible.iter().all(|key| self.selected.contains(key)) {
            for key in visible {
                next.selected.remove(key);
            }
        } else {
            next.selected.extend(visible.iter().cloned());
        }
        next
    }

    /// Returns a selection with `key` added.
    pub fn select(&self, key: K) -> Self {
        let mut next = self.clone();
        next.selected.insert(key);
        next
    }

    /// Returns a selection with `key` removed.
    pub fn deselect(&self, key: &K) -> Self {
        let mut next = self.clone();
        next.selected.remove(key);
        next
    }

    /// Returns an empty selection.
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// `true` when `visible` is non-empty and every key in it is selected.
    pub fn is_all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|key| self.selected.contains(key))
    }

    /// `true` when at least one key in `visible` is selected.
    pub fn is_some_selected(&self, visible: &[K]) -> bool {
        visible.iter().any(|key| self.selected.contains(key))
    }

    /// Header checkbox state for the visible keys.
    pub fn check_state(&self, visible: &[K]) -> CheckState {
        if self.is_all_selected(visible) {
            CheckState::Checked
        } else if self.is_some_selected(visible) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Check if a key is selected.
    pub fn contains(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Number of selected keys, including stale ones.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected keys in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }

    /// Selected keys that are not in `present`.
    pub fn stale_ids<'a>(&'a self, present: &'a [K]) -> impl Iterator<Item = &'a K> + 'a {
        let present: BTreeSet<&K> = present.iter().collect();
        self.selected.iter().filter(move |key| !present.contains(key))
    }

    /// Returns a selection holding only the keys found in `present`.
    pub fn prune(&self, present: &[K]) -> Self {
        let present: BTreeSet<&K> = present.iter().collect();
        self.selected
            .iter()
            .filter(|key| present.contains(key))
            .cloned()
            .collect()
    }

    /// Builds the payload for a bulk action over the selected keys.
    pub fn to_bulk_action(&self, action: impl Into<String>) -> BulkAction<K> {
        BulkAction::new(action, self.selected.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(ids: &[u32]) -> Selection<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_toggle_one() {
        let selected = Selection::new().toggle_one(&5);
        assert!(selected.contains(&5));
        assert!(selected.toggle_one(&5).is_empty());
    }

    #[test]
    fn test_toggle_all_removes_when_all_selected() {
        assert_eq!(selection(&[1, 2, 3]).toggle_all(&[1, 2, 3]), selection(&[]));
    }

    #[test]
    fn test_toggle_all_adds_when_some_missing() {
        assert_eq!(selection(&[1]).toggle_all(&[1, 2, 3]), selection(&[1, 2, 3]));
    }

    #[test]
    fn test_toggle_all_keeps_ids_outside_visible() {
        assert_eq!(selection(&[1, 2, 9]).toggle_all(&[1, 2]), selection(&[9]));
        assert_eq!(selection(&[9]).toggle_all(&[1, 2]), selection(&[1, 2, 9]));
    }

    #[test]
    fn test_toggle_all_empty_visible_is_noop() {
        assert_eq!(selection(&[4]).toggle_all(&[]), selection(&[4]));
    }

    #[test]
    fn test_check_state() {
        assert_eq!(selection(&[1, 2]).check_state(&[1, 2]), CheckState::Checked);
        assert_eq!(selection(&[1]).check_state(&[1, 2]), CheckState::Indeterminate);
        assert_eq!(selection(&[7]).check_state(&[1, 2]), CheckState::Unchecked);
        assert_eq!(selection(&[]).check_state(&[]), CheckState::Unchecked);
    }

    #[test]
    fn test_operations_do_not_mutate() {
        let original = selection(&[1]);
        let _ = original.toggle_one(&2);
        let _ = original.toggle_all(&[1, 3]);
        assert_eq!(original, selection(&[1]));
    }

    #[test]
    fn test_stale_ids_against_large_fleet() {
        let present: Vec<u32> = (0..20_000).collect();
        let selected: Selection<u32> = (0..20_000).step_by(2).chain([25_000, 30_000]).collect();

        let stale: Vec<u32> = selected.stale_ids(&present).copied().collect();
        assert_eq!(stale, vec![25_000, 30_000]);

        let pruned = selected.prune(&present);
        assert_eq!(pruned.len(), 10_000);
        assert!(!pruned.contains(&25_000));
    }

    #[test]
    fn test_stale_ids_and_prune() {
        let selected = selection(&[1, 2, 3]);
        let present = [2, 3, 4];
        assert_eq!(selected.stale_ids(&present).copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(selected.prune(&present), selection(&[2, 3]));
    }

    #[test]
    fn test_to_bulk_action() {
        let action = selection(&[3, 1]).to_bulk_action("delete");
        assert_eq!(action.action(), "delete");
        assert_eq!(action.ids(), &[1, 3]);
    }
}
