use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Normalized column keys of a sheet, shared by all of its rows.
///
/// When two header cells normalize to the same key, keyed lookups resolve to
/// the last such column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keys {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Keys {
    /// Build the key index from keys in column order
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Keys { names, positions }
    }

    /// Column index a key resolves to
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Keys in column order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data record, readable by column index and by normalized key.
///
/// Every row has exactly one cell per key, so `row.get(i)` and
/// `row.get_key(&keys[i])` always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<String>,
    keys: Arc<Keys>,
}

impl Row {
    /// Build a keyed record from raw positional cells.
    ///
    /// Missing trailing cells become empty strings and cells beyond the key
    /// count are dropped. The input is consumed, never shared.
    pub fn from_cells<I, S>(keys: &Arc<Keys>, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let width = keys.len();
        let mut cells: Vec<String> = cells.into_iter().take(width).map(Into::into).collect();
        cells.resize(width, String::new());
        Row {
            cells,
            keys: Arc::clone(keys),
        }
    }

    /// Get a cell by column index (0-based)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Get a cell by normalized key
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&str> {
        self.keys.position(key).and_then(|i| self.get(i))
    }

    /// Resolve a field the way a keyed record does: by key first, then by a
    /// decimal column index.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.get_key(name)
            .or_else(|| name.parse::<usize>().ok().and_then(|i| self.get(i)))
    }

    /// Whether the record has the given field
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Positional cells
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Keys in column order
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.keys.as_slice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert to an ordered key -> value record
    #[must_use]
    pub fn to_record(&self) -> IndexMap<String, String> {
        self.entries()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Key/value pairs in column order, skipping columns shadowed by a later
    /// column with the same key.
    fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(i, key)| self.keys.position(key) == Some(*i))
            .filter_map(|(i, key)| self.get(i).map(|value| (key.as_str(), value)))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(&str, &str)> = self.entries().collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
