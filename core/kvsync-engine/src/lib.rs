//! Key-value reconciliation engine for kvsync.
//!
//! Takes a desired set of named records and makes a remote, eventually
//! consistent key-value store match it exactly, using only a paginated
//! listing API and a non-transactional bulk write API.
//!
//! # Components
//!
//! - **Validator**: raw `name -> value` pairs to typed [`Entry`] values
//! - **Categorizer**: groups written names by prefix, for reporting
//! - **Remote Key Lister**: walks every listing page to a full key set
//! - **Reconciler**: diffs desired against remote, then writes once
//! - **Bulk Writer**: sends the batch, chunked to the store's limit
//!
//! ## Reconciliation pass
//!
//! 1. **Validate**: reject bad names before touching the store
//! 2. **List**: snapshot every remote key
//! 3. **Diff**: writes, explicit deletes, and remote keys not written
//! 4. **Write**: one bulk mutation, writes first then deletes
//!
//! The desired set is a full replacement, not a patch: a remote key the
//! caller never mentioned is deleted.
//!
//! # Example
//!
//! ```
//! use kvsync_engine::{MemoryStore, Reconciler};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test_block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let reconciler = Reconciler::new(store.clone());
//!
//! let result = reconciler
//!     .reconcile_records([("KEEP", json!("ok")), ("DROP", json!(""))])
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.updated, vec!["KEEP"]);
//! assert_eq!(store.get("KEEP").await.as_deref(), Some("\"ok\""));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod categorize;
pub mod cloudflare;
mod error;
pub mod lister;
pub mod memory;
pub mod plan;
pub mod reconciler;
pub mod store;
pub mod validate;
pub mod writer;

pub use categorize::{categorize, categorize_with, category_of};
pub use cloudflare::{CloudflareKvConfig, CloudflareKvStore};
pub use error::{EngineError, EngineResult};
pub use lister::{list_all_keys, RemoteKeySet};
pub use memory::MemoryStore;
pub use plan::ReconcilePlan;
pub use reconciler::{reconcile, reconcile_records, Reconciler, ReconcilerConfig};
pub use store::{KeyPage, KvStore};
pub use validate::{is_deletion_sentinel, is_valid_name, validate, NAME_PATTERN};
pub use writer::write_batch;

pub use kvsync_types::{BulkOp, CategoryMap, Entry, EntryAction, ReconciliationResult};
