//! Bulk actions over selected rows.
//!
//! The view model never performs requests itself. It builds a
//! [`BulkAction`] from the current selection and hands it to a
//! [`BulkActionDispatcher`] supplied by the host application.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DispatchError;

/// An action name plus the ids it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAction<K> {
    action: String,
    ids: Vec<K>,
}

impl<K> BulkAction<K> {
    /// Creates a bulk action payload.
    pub fn new(action: impl Into<String>, ids: Vec<K>) -> Self {
        Self {
            action: action.into(),
            ids,
        }
    }

    /// Returns the action name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the ids in ascending order.
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// Returns `true` if there is nothing to act on.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Performs bulk create/update/delete requests.
///
/// Implemented by the host application on top of its API client.
#[async_trait]
pub trait BulkActionDispatcher<K: Sync>: Send + Sync {
    /// Performs the action for every id in the payload.
    async fn dispatch(&self, action: &BulkAction<K>) -> Result<(), DispatchError>;
}
