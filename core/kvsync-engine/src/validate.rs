//! Validator: turns raw `name -> value` records into typed entries.
//!
//! This is the single gate in front of the remote store. A name outside the
//! key grammar or an empty payload never gets past it.

use crate::error::{EngineError, EngineResult};
use kvsync_types::Entry;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Allowed record names: `grouped`, `grouped:<lowercase>`, or an
/// uppercase/digit/underscore identifier.
pub const NAME_PATTERN: &str = r"^(grouped(:[a-z]+)?|[A-Z0-9_]+)$";

// Fails closed: if the pattern ever stopped compiling, no name would pass.
static NAME_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(NAME_PATTERN).ok());

/// Returns true if `name` matches the record key grammar.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.as_ref().is_some_and(|re| re.is_match(name))
}

/// Returns true for values that mean "this record should not exist":
/// null, a blank string, or an object with no keys. Empty arrays are data.
pub fn is_deletion_sentinel(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Validates raw records into entries, preserving input order.
///
/// Sentinel values become tombstones; everything else is serialized to
/// compact JSON. Fails on the first bad name or unserializable value.
///
/// Records behave like a map: each name appears once in the output. A
/// repeated name keeps its first position and takes its last value.
pub fn validate<I, K, V>(records: I) -> EngineResult<Vec<Entry>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    let entries = records
        .into_iter()
        .map(|(name, value)| validate_record(name.into(), &value))
        .collect::<EngineResult<Vec<Entry>>>()?;
    Ok(collapse_duplicates(entries))
}

/// Keeps one entry per name: first-seen position, last-seen action.
pub(crate) fn collapse_duplicates(entries: Vec<Entry>) -> Vec<Entry> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut unique: Vec<Entry> = Vec::with_capacity(entries.len());

    for entry in entries {
        match positions.get(&entry.name) {
            Some(&index) => unique[index] = entry,
            None => {
                positions.insert(entry.name.clone(), unique.len());
                unique.push(entry);
            }
        }
    }
    unique
}

fn validate_record<V: Serialize>(name: String, value: &V) -> EngineResult<Entry> {
    if !is_valid_name(&name) {
        return Err(EngineError::InvalidName { name });
    }

    let value = match serde_json::to_value(value) {
        Ok(value) => value,
        Err(source) => return Err(EngineError::Serialization { name, source }),
    };

    if is_deletion_sentinel(&value) {
        return Ok(Entry::delete(name));
    }

    match serde_json::to_string(&value) {
        Ok(payload) => Ok(Entry::write(name, payload)),
        Err(source) => Err(EngineError::Serialization { name, source }),
    }
}
