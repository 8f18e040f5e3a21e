//! Insertion-ordered grouping of record names by category.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Mapping from category token to the record names in it.
///
/// Categories and their members both keep first-insertion order. Serializes
/// as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    groups: Vec<(String, Vec<String>)>,
}

impl CategoryMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` to `category`, creating the category if needed.
    pub fn insert(&mut self, category: &str, name: impl Into<String>) {
        let name = name.into();
        match self.groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, members)) => members.push(name),
            None => self.groups.push((category.to_string(), vec![name])),
        }
    }

    /// Members of a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, members)| members.as_slice())
    }

    /// Category tokens in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(c, _)| c.as_str())
    }

    /// Iterates `(category, members)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(c, members)| (c.as_str(), members.as_slice()))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (category, members) in &self.groups {
            map.serialize_entry(category, members)?;
        }
        map.end()
    }
}
