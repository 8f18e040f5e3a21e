//! Bulk Writer: sends a mutation batch to the store.

use crate::error::{EngineError, EngineResult};
use crate::store::KvStore;
use kvsync_types::BulkOp;
use tracing::{debug, warn};

/// Writes the whole batch, split into sequential chunks no larger than the
/// store's bulk limit. Returns the number of records sent.
///
/// Stops at the first failing chunk. The returned `RemoteWrite` error reports
/// how many records earlier chunks committed; the remote state is then
/// partially applied and it is up to the caller to re-run reconciliation.
pub async fn write_batch(store: &dyn KvStore, batch: &[BulkOp]) -> EngineResult<usize> {
    let chunk_size = store.max_batch_size().max(1);
    let mut committed = 0usize;

    for chunk in batch.chunks(chunk_size) {
        match store.bulk_write(chunk).await {
            Ok(()) => {
                committed += chunk.len();
                debug!(
                    "{}: bulk write accepted {} records ({}/{})",
                    store.provider_name(),
                    chunk.len(),
                    committed,
                    batch.len()
                );
            }
            Err(EngineError::RemoteWrite { status, body, .. }) => {
                warn!(
                    "{}: bulk write failed with {} of {} records committed",
                    store.provider_name(),
                    committed,
                    batch.len()
                );
                return Err(EngineError::RemoteWrite {
                    status,
                    body,
                    committed,
                });
            }
            Err(other) => return Err(other),
        }
    }

    Ok(committed)
}
