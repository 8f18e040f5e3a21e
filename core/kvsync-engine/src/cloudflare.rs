//! Workers KV storage implementation.
//!
//! Uses the Cloudflare v4 REST API: paginated key listing and the bulk
//! write endpoint.

use crate::error::{EngineError, EngineResult};
use crate::store::{KeyPage, KvStore};
use async_trait::async_trait;
use kvsync_types::BulkOp;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Workers KV namespace configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudflareKvConfig {
    /// Cloudflare account ID.
    pub account_id: String,
    /// KV namespace ID.
    pub namespace_id: String,
    /// API token with KV read/write permission.
    pub api_token: String,
    /// Base URL for the API (e.g. `https://api.cloudflare.com/client/v4`).
    pub api_base_url: String,
    /// Keys requested per listing page.
    pub page_size: u32,
    /// Records per bulk write call.
    pub max_batch_size: usize,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for CloudflareKvConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            namespace_id: String::new(),
            api_token: String::new(),
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            page_size: 1000,
            max_batch_size: 10_000,
            timeout_secs: 60,
        }
    }
}

impl fmt::Debug for CloudflareKvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareKvConfig")
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("page_size", &self.page_size)
            .field("max_batch_size", &self.max_batch_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Listing API response structures.
#[derive(Debug, Deserialize)]
struct KeyListResponse {
    #[serde(default)]
    result: Vec<KeyInfo>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct KeyInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    cursor: Option<String>,
    list_complete: Option<bool>,
}

/// Workers KV store.
pub struct CloudflareKvStore {
    config: CloudflareKvConfig,
    client: Client,
}

impl CloudflareKvStore {
    /// Creates a new store client.
    pub fn new(config: CloudflareKvConfig) -> EngineResult<Self> {
        if config.account_id.is_empty() || config.namespace_id.is_empty() {
            return Err(EngineError::Config(
                "account_id and namespace_id are required".to_string(),
            ));
        }
        if config.page_size == 0 {
            return Err(EngineError::Config("page_size must be positive".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CloudflareKvConfig {
        &self.config
    }

    fn namespace_url(&self) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_id,
            self.config.namespace_id
        )
    }
}

#[async_trait]
impl KvStore for CloudflareKvStore {
    fn provider_name(&self) -> &'static str {
        "Workers KV"
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }

    async fn list_keys(&self, cursor: Option<&str>) -> EngineResult<KeyPage> {
        let limit = self.config.page_size.to_string();
        let mut request = self
            .client
            .get(format!("{}/keys", self.namespace_url()))
            .bearer_auth(&self.config.api_token)
            .query(&[("limit", limit.as_str())]);

        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request.send().await.map_err(|e| EngineError::RemoteList {
            status: None,
            body: format!("key list request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::RemoteList {
                status: Some(status.as_u16()),
                body,
            });
        }

        let list: KeyListResponse = response.json().await.map_err(|e| EngineError::RemoteList {
            status: Some(status.as_u16()),
            body: format!("failed to parse key list: {e}"),
        })?;

        let (cursor, list_complete) = list
            .result_info
            .map(|info| (info.cursor, info.list_complete))
            .unwrap_or_default();

        Ok(KeyPage {
            keys: list.result.into_iter().map(|k| k.name).collect(),
            cursor,
            list_complete,
        })
    }

    async fn bulk_write(&self, batch: &[BulkOp]) -> EngineResult<()> {
        debug!("Sending bulk write of {} records", batch.len());

        let response = self
            .client
            .put(format!("{}/bulk", self.namespace_url()))
            .bearer_auth(&self.config.api_token)
            .json(batch)
            .send()
            .await
            .map_err(|e| EngineError::RemoteWrite {
                status: None,
                body: format!("bulk write request failed: {e}"),
                committed: 0,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::RemoteWrite {
                status: Some(status.as_u16()),
                body,
                committed: 0,
            });
        }

        Ok(())
    }
}
