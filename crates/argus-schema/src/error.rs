//! Validation error messages.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Key under which schema-level validator messages are reported.
pub const SCHEMA_KEY: &str = "_schema";

/// Field name to list of messages, in the order fields were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMessages(IndexMap<String, Vec<String>>);

impl ErrorMessages {
    /// Creates an empty message map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message for `key`.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    /// Appends several messages for `key`.
    pub fn extend(&mut self, key: impl Into<String>, messages: impl IntoIterator<Item = String>) {
        self.0.entry(key.into()).or_default().extend(messages);
    }

    /// Messages recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns true when `key` has at least one message.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys with messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no messages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Renders the messages as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMessages
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut messages = Self::new();
        for (key, message) in iter {
            messages.add(key, message);
        }
        messages
    }
}

impl fmt::Display for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, messages)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", key, messages.join(" "))?;
        }
        Ok(())
    }
}

/// Loading a schema failed for one or more fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {messages}")]
pub struct ValidationError {
    messages: ErrorMessages,
}

impl ValidationError {
    /// Wraps a non-empty message map.
    #[must_use]
    pub fn new(messages: ErrorMessages) -> Self {
        Self { messages }
    }

    /// The per-field messages.
    #[must_use]
    pub fn messages(&self) -> &ErrorMessages {
        &self.messages
    }

    /// Consumes the error, returning the messages.
    #[must_use]
    pub fn into_messages(self) -> ErrorMessages {
        self.messages
    }
}
