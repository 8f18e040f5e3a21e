//! Bulk mutation wire records.

use crate::entry::{Entry, EntryAction};
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// One element of a bulk mutation request body.
///
/// Serializes as `{"key": .., "value": ..}` for writes and
/// `{"key": .., "delete": true}` for deletes, so a batch can mix both freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulkOp {
    Put { key: String, value: String },
    Delete {
        key: String,
        #[serde(deserialize_with = "delete_marker")]
        delete: bool,
    },
}

/// Accepts only `"delete": true`; a `false` marker is not a delete record.
fn delete_marker<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    if bool::deserialize(deserializer)? {
        Ok(true)
    } else {
        Err(D::Error::custom("delete marker must be true"))
    }
}

impl BulkOp {
    /// Creates a write record.
    #[must_use]
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a delete record.
    #[must_use]
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete {
            key: key.into(),
            delete: true,
        }
    }

    /// The key this record targets.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key, .. } => key,
        }
    }

    /// Returns true for delete records.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

impl From<Entry> for BulkOp {
    fn from(entry: Entry) -> Self {
        match entry.action {
            EntryAction::Write(value) => Self::put(entry.name, value),
            EntryAction::Delete => Self::delete(entry.name),
        }
    }
}
