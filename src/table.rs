#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::{Key, Value};
use foldhash::HashMap;

/// Tables with at least this many entries keep a hash index over their keys;
/// smaller ones are scanned linearly.
pub(crate) const INDEXED_TABLE_THRESHOLD: usize = 6;

type TableEntry = (Key, Value);

/// An ordered table of `(`[`Key`]`, `[`Value`]`)` pairs.
///
/// Every table returned by [`load`](crate::load), including nested ones, is a
/// `Table`. Keys are unique and entries keep the order they were first
/// inserted in. Equality compares contents and ignores that order.
///
/// # Examples
///
/// ```
/// let table = toml_peg::load("b = 1\na = 2")?;
/// let keys: Vec<&str> = table.keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, ["b", "a"]);
/// assert_eq!(table["a"].as_i64(), Some(2));
/// # Ok::<(), toml_peg::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<TableEntry>,
    /// Key name to entry position, present once the table reached
    /// [`INDEXED_TABLE_THRESHOLD`] entries.
    index: Option<HashMap<String, usize>>,
}

impl Table {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Table {
        Table::default()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.find_index(name)?;
        Some(&self.entries[idx].1)
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let idx = self.find_index(name)?;
        Some(&mut self.entries[idx].1)
    }

    /// Returns both the stored key, with its span, and the value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&Key, &Value)> {
        let idx = self.find_index(name)?;
        let (key, value) = &self.entries[idx];
        Some((key, value))
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present, the entry keeps its position, takes the
    /// new key (and so the new span) and value, and the previous value is
    /// returned.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Some(idx) = self.find_index(&key.name) {
            let entry = &mut self.entries[idx];
            entry.0 = key;
            return Some(std::mem::replace(&mut entry.1, value));
        }

        let idx = self.entries.len();
        if let Some(index) = &mut self.index {
            index.insert(key.name.clone(), idx);
        }
        self.entries.push((key, value));
        if self.entries.len() == INDEXED_TABLE_THRESHOLD {
            self.rebuild_index();
        }
        None
    }

    /// Removes the entry for `name`, returning its value.
    ///
    /// The remaining entries keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.remove_entry(name).map(|(_, v)| v)
    }

    /// Removes the entry for `name`, returning the key-value pair.
    pub fn remove_entry(&mut self, name: &str) -> Option<(Key, Value)> {
        let idx = self.find_index(name)?;
        let entry = self.entries.remove(idx);
        self.rebuild_index();
        Some(entry)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TableEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns a slice of all entries.
    #[inline]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    // -- key index helpers ----------------------------------------------------

    /// Uses the hash index for tables at or above the threshold, otherwise
    /// falls back to a linear scan.
    fn find_index(&self, name: &str) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(name).copied(),
            None => self.entries.iter().position(|(key, _)| key.name == name),
        }
    }

    fn rebuild_index(&mut self) {
        if self.entries.len() < INDEXED_TABLE_THRESHOLD {
            self.index = None;
            return;
        }
        let index = self.index.get_or_insert_with(HashMap::default);
        index.clear();
        for (i, (key, _)) in self.entries.iter().enumerate() {
            index.insert(key.name.clone(), i);
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(&key.name) == Some(value))
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.entries {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl std::ops::Index<&str> for Table {
    type Output = Value;

    #[track_caller]
    fn index(&self, key: &str) -> &Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key `{key}`"),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a (Key, Value);
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Key, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&k.name, v)?;
        }
        map.end()
    }
}
