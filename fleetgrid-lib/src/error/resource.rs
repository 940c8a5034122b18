//! Resource error shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Errors reported by the server for a resource request.
///
/// The server either sends a single message or a map of field name to
/// messages, so this deserializes from either shape.
///
/// # Example
///
/// ```
/// use fleetgrid_lib::error::ResourceErrors;
///
/// let errors: ResourceErrors =
///     serde_json::from_str(r#"{"hostname": ["Already in use."]}"#).unwrap();
/// assert_eq!(errors.field("hostname"), Some(&["Already in use.".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceErrors {
    /// A single error message.
    Message(String),
    /// Errors keyed by field name.
    Fields(BTreeMap<String, Vec<String>>),
}

impl ResourceErrors {
    /// Returns the messages for a field, if this is a field error map.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        match self {
            Self::Message(_) => None,
            Self::Fields(fields) => fields.get(name).map(Vec::as_slice),
        }
    }

    /// Flattens the errors into display lines.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Message(message) => vec![message.clone()],
            Self::Fields(fields) => fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |m| format!("{}: {}", field, m))
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for ResourceErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl From<&str> for ResourceErrors {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ResourceErrors {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}
