//! Shared test helpers for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kvsync_engine::{BulkOp, EngineError, EngineResult, KeyPage, KvStore};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Installs a test subscriber once; respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a page from key names.
pub fn page(keys: &[&str], cursor: Option<&str>, list_complete: Option<bool>) -> KeyPage {
    KeyPage {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        cursor: cursor.map(str::to_string),
        list_complete,
    }
}

/// A store that replays a fixed sequence of listing responses.
pub struct ScriptedStore {
    pages: Mutex<VecDeque<EngineResult<KeyPage>>>,
    cursors: Mutex<Vec<Option<String>>>,
    writes: Mutex<Vec<Vec<BulkOp>>>,
}

impl ScriptedStore {
    pub fn new(pages: Vec<EngineResult<KeyPage>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub async fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().await.clone()
    }

    pub async fn writes(&self) -> Vec<Vec<BulkOp>> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl KvStore for ScriptedStore {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    async fn list_keys(&self, cursor: Option<&str>) -> EngineResult<KeyPage> {
        self.cursors.lock().await.push(cursor.map(str::to_string));
        self.pages.lock().await.pop_front().unwrap_or_else(|| {
            Err(EngineError::RemoteList {
                status: None,
                body: "script exhausted".to_string(),
            })
        })
    }

    async fn bulk_write(&self, batch: &[BulkOp]) -> EngineResult<()> {
        self.writes.lock().await.push(batch.to_vec());
        Ok(())
    }
}
