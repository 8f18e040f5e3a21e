//! Entries: one record the engine will either write or delete.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What should happen to a record in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum EntryAction {
    /// Store this serialized payload under the record's name.
    Write(String),
    /// Tombstone: the record must not exist remotely.
    Delete,
}

/// A validated record name paired with its action.
///
/// Entries are only produced by the engine's validator, which guarantees the
/// name matches the allowed key grammar and that `Write` payloads are never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(flatten)]
    pub action: EntryAction,
}

impl Entry {
    /// Creates a write entry.
    #[must_use]
    pub fn write(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: EntryAction::Write(value.into()),
        }
    }

    /// Creates a tombstone entry.
    #[must_use]
    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: EntryAction::Delete,
        }
    }

    /// Returns true if this entry is a tombstone.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.action, EntryAction::Delete)
    }

    /// Returns the payload for write entries.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.action {
            EntryAction::Write(value) => Some(value),
            EntryAction::Delete => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            EntryAction::Write(value) => write!(f, "write {} ({} bytes)", self.name, value.len()),
            EntryAction::Delete => write!(f, "delete {}", self.name),
        }
    }
}
