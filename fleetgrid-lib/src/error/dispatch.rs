//! Bulk action dispatch errors

use super::ResourceErrors;

/// Failure reported by a [`BulkActionDispatcher`](crate::bulk::BulkActionDispatcher).
#[derive(Debug, Clone, thiserror::Error)]
#[error("Bulk action '{action}' failed: {message}")]
pub struct DispatchError {
    /// The action that was being dispatched.
    pub action: String,
    /// Human-readable failure message.
    pub message: String,
    /// Structured errors returned by the server, if any.
    pub errors: Option<ResourceErrors>,
}

impl DispatchError {
    /// Creates a new dispatch error.
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Attaches the server's structured errors.
    pub fn with_errors(mut self, errors: ResourceErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}
