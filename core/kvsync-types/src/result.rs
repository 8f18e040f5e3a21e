use crate::category::CategoryMap;
use serde::Serialize;

/// Caller-facing record of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Names written, in desired-set order.
    pub updated: Vec<String>,
    /// Names deleted (explicit tombstones and stale remote keys).
    pub deleted: Vec<String>,
    /// Written names grouped by category.
    pub groups: CategoryMap,
    /// True when the pass was planned but the bulk write was not sent.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl ReconciliationResult {
    /// Returns true if the pass changed nothing remotely.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.dry_run || (self.updated.is_empty() && self.deleted.is_empty())
    }
}
