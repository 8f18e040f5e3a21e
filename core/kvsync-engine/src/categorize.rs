//! Categorizer: groups entry names by category for reporting.

use kvsync_types::{CategoryMap, Entry};

/// Default category rule: the name up to the first `:` or `_`, or the whole
/// name if neither appears.
pub fn category_of(name: &str) -> &str {
    name.split([':', '_']).next().unwrap_or(name)
}

/// Groups entries with [`category_of`].
pub fn categorize(entries: &[Entry]) -> CategoryMap {
    categorize_with(entries, category_of)
}

/// Groups entries using a caller-supplied category rule.
pub fn categorize_with<F>(entries: &[Entry], rule: F) -> CategoryMap
where
    F: Fn(&str) -> &str,
{
    let mut groups = CategoryMap::new();
    for entry in entries {
        groups.insert(rule(&entry.name), entry.name.clone());
    }
    groups
}
