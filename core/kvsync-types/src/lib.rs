//! Core type definitions for kvsync.
//!
//! This crate defines the plain data exchanged between the reconciliation
//! engine and its callers:
//! - Entries (a named record to write, or a tombstone to delete)
//! - Bulk mutation records as sent over the wire
//! - The category view and the per-call reconciliation result
//!
//! No I/O lives here; see `kvsync-engine` for validation and remote access.

mod batch;
mod category;
mod entry;
mod result;

pub use batch::BulkOp;
pub use category::CategoryMap;
pub use entry::{Entry, EntryAction};
pub use result::ReconciliationResult;
