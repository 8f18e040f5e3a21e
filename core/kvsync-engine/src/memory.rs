//! In-memory store implementation.
//!
//! Paginates with numeric offset cursors and applies each bulk call
//! atomically. Records every remote call and can be told to fail, which makes
//! it the reference fake for exercising the reconciler.

use crate::error::{EngineError, EngineResult};
use crate::store::{KeyPage, KvStore};
use async_trait::async_trait;
use kvsync_types::BulkOp;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A scripted failure: the remote status and response body to return.
#[derive(Debug, Clone)]
struct Failure {
    /// 1-based call number that fails; `None` fails every call.
    on_call: Option<usize>,
    status: u16,
    body: String,
}

impl Failure {
    fn applies_to(&self, call: usize) -> bool {
        self.on_call.is_none_or(|n| n == call)
    }
}

#[derive(Debug, Default)]
struct Calls {
    list_cursors: Vec<Option<String>>,
    writes: Vec<Vec<BulkOp>>,
}

/// In-memory key-value store.
#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
    calls: RwLock<Calls>,
    list_failure: RwLock<Option<Failure>>,
    write_failure: RwLock<Option<Failure>>,
    page_size: usize,
    max_batch_size: usize,
}

impl MemoryStore {
    /// Creates an empty store with a page size of 1000.
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    /// Creates an empty store that returns at most `page_size` keys per page.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            calls: RwLock::new(Calls::default()),
            list_failure: RwLock::new(None),
            write_failure: RwLock::new(None),
            page_size: page_size.max(1),
            max_batch_size: 10_000,
        }
    }

    /// Sets the bulk write limit.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size.max(1);
        self
    }

    /// Seeds the store with records.
    pub async fn seed<I, K, V>(&self, records: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut guard = self.records.write().await;
        for (key, value) in records {
            guard.insert(key.into(), value.into());
        }
    }

    /// Returns a copy of the stored records.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.records.read().await.clone()
    }

    /// Returns the stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }

    /// Returns the value stored under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.records.read().await.get(key).cloned()
    }

    /// Cursors sent to `list_keys`, one per call.
    pub async fn list_calls(&self) -> Vec<Option<String>> {
        self.calls.read().await.list_cursors.clone()
    }

    /// Batches sent to `bulk_write`, one per call.
    pub async fn write_calls(&self) -> Vec<Vec<BulkOp>> {
        self.calls.read().await.writes.clone()
    }

    /// Makes every `list_keys` call fail.
    pub async fn fail_list(&self, status: u16, body: &str) {
        *self.list_failure.write().await = Some(Failure {
            on_call: None,
            status,
            body: body.to_string(),
        });
    }

    /// Makes only the `n`th `list_keys` call (1-based) fail.
    pub async fn fail_list_on_call(&self, n: usize, status: u16, body: &str) {
        *self.list_failure.write().await = Some(Failure {
            on_call: Some(n),
            status,
            body: body.to_string(),
        });
    }

    /// Makes every `bulk_write` call fail.
    pub async fn fail_write(&self, status: u16, body: &str) {
        *self.write_failure.write().await = Some(Failure {
            on_call: None,
            status,
            body: body.to_string(),
        });
    }

    /// Makes only the `n`th `bulk_write` call (1-based) fail.
    pub async fn fail_write_on_call(&self, n: usize, status: u16, body: &str) {
        *self.write_failure.write().await = Some(Failure {
            on_call: Some(n),
            status,
            body: body.to_string(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    async fn list_keys(&self, cursor: Option<&str>) -> EngineResult<KeyPage> {
        let call = {
            let mut calls = self.calls.write().await;
            calls.list_cursors.push(cursor.map(str::to_string));
            calls.list_cursors.len()
        };

        if let Some(failure) = self.list_failure.read().await.as_ref() {
            if failure.applies_to(call) {
                return Err(EngineError::RemoteList {
                    status: Some(failure.status),
                    body: failure.body.clone(),
                });
            }
        }

        let offset = match cursor {
            None => 0,
            Some(c) => c.parse::<usize>().map_err(|_| EngineError::RemoteList {
                status: Some(400),
                body: format!("invalid cursor: {c}"),
            })?,
        };

        let records = self.records.read().await;
        let keys: Vec<String> = records
            .keys()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = offset + keys.len();
        let complete = next >= records.len();

        Ok(KeyPage {
            keys,
            cursor: (!complete).then(|| next.to_string()),
            list_complete: Some(complete),
        })
    }

    async fn bulk_write(&self, batch: &[BulkOp]) -> EngineResult<()> {
        let call = {
            let mut calls = self.calls.write().await;
            calls.writes.push(batch.to_vec());
            calls.writes.len()
        };

        if let Some(failure) = self.write_failure.read().await.as_ref() {
            if failure.applies_to(call) {
                return Err(EngineError::RemoteWrite {
                    status: Some(failure.status),
                    body: failure.body.clone(),
                    committed: 0,
                });
            }
        }

        if batch.len() > self.max_batch_size {
            return Err(EngineError::RemoteWrite {
                status: Some(413),
                body: format!(
                    "batch of {} exceeds limit of {}",
                    batch.len(),
                    self.max_batch_size
                ),
                committed: 0,
            });
        }

        let mut records = self.records.write().await;
        for op in batch {
            match op {
                BulkOp::Put { key, value } => {
                    records.insert(key.clone(), value.clone());
                }
                BulkOp::Delete { key, .. } => {
                    records.remove(key);
                }
            }
        }
        Ok(())
    }
}
