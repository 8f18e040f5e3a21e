//! Reconciler: orchestrates list -> diff -> bulk write.
//!
//! Each call is strictly sequential and holds no state between calls. Two
//! concurrent reconciliations against the same store race on the key
//! snapshot; callers must serialize them.

use crate::error::EngineResult;
use crate::lister::list_all_keys;
use crate::plan::ReconcilePlan;
use crate::store::KvStore;
use crate::validate::validate;
use crate::writer::write_batch;
use kvsync_types::{Entry, ReconciliationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Configuration for the reconciler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Compute and report the plan without sending the bulk mutation.
    /// The returned result has `dry_run` set; its `updated` and `deleted`
    /// lists describe what would have been written.
    #[serde(default)]
    pub dry_run: bool,
}

/// Makes a remote store match a desired entry set.
pub struct Reconciler {
    store: Arc<dyn KvStore>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Creates a reconciler with the default configuration.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_config(store, ReconcilerConfig::default())
    }

    /// Creates a reconciler with a custom configuration.
    pub fn with_config(store: Arc<dyn KvStore>, config: ReconcilerConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Lists the remote keys and computes the plan. Sends no writes.
    pub async fn plan(&self, entries: &[Entry]) -> EngineResult<ReconcilePlan> {
        plan(self.store.as_ref(), entries).await
    }

    /// Reconciles the remote store against `entries`.
    pub async fn reconcile(&self, entries: &[Entry]) -> EngineResult<ReconciliationResult> {
        let plan = self.plan(entries).await?;
        if self.config.dry_run {
            info!(
                "{}: dry run, skipping bulk write of {} records",
                self.store.provider_name(),
                plan.batch().len()
            );
            return Ok(ReconciliationResult {
                dry_run: true,
                ..plan.to_result()
            });
        }
        apply(self.store.as_ref(), &plan).await
    }

    /// Validates raw records, then reconciles them.
    pub async fn reconcile_records<I, K, V>(&self, records: I) -> EngineResult<ReconciliationResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let entries = validate(records)?;
        self.reconcile(&entries).await
    }
}

/// Lists the remote keys and computes the plan against them.
pub async fn plan(store: &dyn KvStore, entries: &[Entry]) -> EngineResult<ReconcilePlan> {
    let remote_keys = list_all_keys(store).await?;
    let plan = ReconcilePlan::compute(entries, &remote_keys);
    info!(
        "{}: plan has {} writes, {} explicit deletes, {} implicit deletes",
        store.provider_name(),
        plan.writes().len(),
        plan.explicit_deletes().len(),
        plan.implicit_deletes().len()
    );
    Ok(plan)
}

/// Sends a computed plan as a single bulk mutation. An empty plan makes no
/// remote call.
pub async fn apply(store: &dyn KvStore, plan: &ReconcilePlan) -> EngineResult<ReconciliationResult> {
    let batch = plan.batch();
    if !batch.is_empty() {
        write_batch(store, &batch).await?;
    }
    Ok(plan.to_result())
}

/// Full reconciliation pass against `store`: list, diff, write.
pub async fn reconcile(store: &dyn KvStore, entries: &[Entry]) -> EngineResult<ReconciliationResult> {
    let plan = plan(store, entries).await?;
    apply(store, &plan).await
}

/// Validates raw records and reconciles them. Validation failures return
/// before any remote call.
pub async fn reconcile_records<I, K, V>(
    store: &dyn KvStore,
    records: I,
) -> EngineResult<ReconciliationResult>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    let entries = validate(records)?;
    reconcile(store, &entries).await
}
