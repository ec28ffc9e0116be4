//! An ordered multivalued map used for query, matrix, and path parameters.

use indexmap::IndexMap;

/// A multivalued map which preserves both the insertion order of keys and
/// the arrival order of the values stored under each key.
///
/// Repeated appends under the same key accumulate; they never overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiMap {
    inner: IndexMap<String, Vec<String>>,
}

impl MultiMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the list stored under `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .entry(name.into())
            .or_insert_with(Vec::new)
            .push(value.into());
    }

    /// Returns all values stored under `name`, in arrival order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// Returns the first value stored under `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)?.first().map(String::as_str)
    }

    /// Returns `true` if the map contains `name`.
    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over `(name, values)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
