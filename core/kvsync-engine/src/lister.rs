//! Remote Key Lister: walks the paginated listing to completion.

use crate::error::{EngineError, EngineResult};
use crate::store::KvStore;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Snapshot of the keys present remotely at listing time.
pub type RemoteKeySet = BTreeSet<String>;

/// Lists every key in the store.
///
/// Any page failure aborts the walk; a partial key set is never returned,
/// since reconciling against one would under-delete.
pub async fn list_all_keys(store: &dyn KvStore) -> EngineResult<RemoteKeySet> {
    let mut keys = RemoteKeySet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.list_keys(cursor.as_deref()).await?;
        pages += 1;
        debug!(
            "{}: page {} returned {} keys",
            store.provider_name(),
            pages,
            page.keys.len()
        );

        let done = page.is_last();
        let next = page.next_cursor().map(str::to_string);
        keys.extend(page.keys);

        if done {
            break;
        }

        if next.is_some() && next == cursor {
            return Err(EngineError::RemoteList {
                status: None,
                body: format!("listing cursor did not advance after page {pages}"),
            });
        }
        cursor = next;
    }

    info!(
        "{}: listed {} remote keys in {} pages",
        store.provider_name(),
        keys.len(),
        pages
    );
    Ok(keys)
}
