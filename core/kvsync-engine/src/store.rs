//! Remote key-value store abstraction.
//!
//! The engine only ever needs two remote operations: list one page of keys,
//! and apply one bulk mutation. Implementations own transport, auth and
//! any retry policy.

use crate::error::EngineResult;
use async_trait::async_trait;
use kvsync_types::BulkOp;
use serde::{Deserialize, Serialize};

/// One page of a remote key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPage {
    /// Key names on this page.
    pub keys: Vec<String>,
    /// Opaque continuation token for the next page.
    pub cursor: Option<String>,
    /// Explicit completion flag, if the remote sent one.
    pub list_complete: Option<bool>,
}

impl KeyPage {
    /// Returns true if no further page should be requested.
    ///
    /// A missing or empty cursor ends the walk even when the completion flag
    /// is absent or false.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.list_complete == Some(true) || self.next_cursor().is_none()
    }

    /// The cursor to send for the next page, if any.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Narrow capability interface over a remote key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the name of the store provider, for logs.
    fn provider_name(&self) -> &'static str;

    /// Largest number of records accepted by one `bulk_write` call.
    fn max_batch_size(&self) -> usize {
        10_000
    }

    /// Fetches one page of keys, starting at `cursor` (or the beginning).
    async fn list_keys(&self, cursor: Option<&str>) -> EngineResult<KeyPage>;

    /// Applies one bulk mutation. Success or failure covers the whole call.
    async fn bulk_write(&self, batch: &[BulkOp]) -> EngineResult<()>;
}
