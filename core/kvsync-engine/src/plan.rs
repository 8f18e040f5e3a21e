//! Reconciliation plan: the diff between the desired set and the remote keys.
//!
//! The desired write set is authoritative. Every remote key that is not
//! written is deleted, whether or not the caller named it.

use crate::categorize::categorize;
use crate::lister::RemoteKeySet;
use crate::validate::collapse_duplicates;
use kvsync_types::{BulkOp, Entry, EntryAction, ReconciliationResult};
use std::collections::{BTreeSet, HashSet};

/// The writes and deletes needed to make the remote store match the desired
/// entries. Pure data; computing it has no side effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    writes: Vec<Entry>,
    explicit_deletes: BTreeSet<String>,
    implicit_deletes: BTreeSet<String>,
}

impl ReconcilePlan {
    /// Computes the plan for `entries` against a remote key snapshot.
    ///
    /// A name listed more than once counts once, with its last action.
    pub fn compute(entries: &[Entry], remote_keys: &RemoteKeySet) -> Self {
        let entries = collapse_duplicates(entries.to_vec());
        let (tombstones, writes): (Vec<&Entry>, Vec<&Entry>) =
            entries.iter().partition(|e| e.is_delete());

        let explicit_deletes: BTreeSet<String> =
            tombstones.into_iter().map(|e| e.name.clone()).collect();

        let written: HashSet<&str> = writes.iter().map(|e| e.name.as_str()).collect();
        let implicit_deletes: BTreeSet<String> = remote_keys
            .iter()
            .filter(|key| !written.contains(key.as_str()))
            .cloned()
            .collect();

        Self {
            writes: writes.into_iter().cloned().collect(),
            explicit_deletes,
            implicit_deletes,
        }
    }

    /// Payload-bearing entries, in desired-set order.
    pub fn writes(&self) -> &[Entry] {
        &self.writes
    }

    /// Names the caller tombstoned.
    pub fn explicit_deletes(&self) -> &BTreeSet<String> {
        &self.explicit_deletes
    }

    /// Remote keys absent from the write set.
    pub fn implicit_deletes(&self) -> &BTreeSet<String> {
        &self.implicit_deletes
    }

    /// Every name to delete: explicit ∪ implicit, each once.
    pub fn final_deletes(&self) -> BTreeSet<String> {
        self.explicit_deletes
            .union(&self.implicit_deletes)
            .cloned()
            .collect()
    }

    /// The bulk mutation: all writes, then all deletes.
    pub fn batch(&self) -> Vec<BulkOp> {
        let puts = self.writes.iter().filter_map(|entry| match &entry.action {
            EntryAction::Write(value) => Some(BulkOp::put(&entry.name, value)),
            EntryAction::Delete => None,
        });
        let deletes = self.final_deletes().into_iter().map(BulkOp::delete);
        puts.chain(deletes).collect()
    }

    /// Returns true if applying the plan would make no remote call.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.explicit_deletes.is_empty() && self.implicit_deletes.is_empty()
    }

    /// The caller-facing summary of this plan.
    pub fn to_result(&self) -> ReconciliationResult {
        ReconciliationResult {
            updated: self.writes.iter().map(|e| e.name.clone()).collect(),
            deleted: self.final_deletes().into_iter().collect(),
            groups: categorize(&self.writes),
            dry_run: false,
        }
    }
}
