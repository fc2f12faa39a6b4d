#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::{Span, Table, Timestamp};
use std::fmt;

/// A loaded value.
///
/// Use the `as_*` methods ([`as_str`](Self::as_str),
/// [`as_i64`](Self::as_i64), [`as_table`](Self::as_table), etc.) to extract
/// the payload, or match on the variants directly.
///
/// Values support indexing with `&str` (table lookup) and `usize` (array
/// access). Like the standard collections, indexing panics when the value is
/// of the wrong type or the entry is missing; use [`get`](Self::get) for a
/// non-panicking lookup.
///
/// # Examples
///
/// ```
/// let table = toml_peg::load("[server]\nport = 8080\nhosts = [\"a\", \"b\"]")?;
/// let server = &table["server"];
/// assert_eq!(server["port"].as_i64(), Some(8080));
/// assert_eq!(server["hosts"][1].as_str(), Some("b"));
/// assert!(server.get("missing").is_none());
/// # Ok::<(), toml_peg::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// A UTC timestamp with second precision.
    Datetime(Timestamp),
    /// A string with escapes already resolved.
    String(String),
    /// Elements that were all of one kind in the source.
    Array(Vec<Value>),
    /// A nested table.
    Table(Table),
}

impl Value {
    /// Returns the type name (e.g. `"string"`, `"integer"`, `"table"`).
    #[inline]
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Timestamp> {
        match self {
            Value::Datetime(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up `key` if this is a table.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table()?.get(key)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => fmt::Debug::fmt(i, f),
            Value::Float(v) => fmt::Debug::fmt(v, f),
            Value::Boolean(b) => fmt::Debug::fmt(b, f),
            Value::Datetime(t) => fmt::Debug::fmt(t, f),
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Table(t) => fmt::Debug::fmt(t, f),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Datetime(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

impl std::ops::Index<&str> for Value {
    type Output = Value;

    #[track_caller]
    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Table(table) => &table[key],
            other => panic!("cannot index {} with key `{key}`", other.type_str()),
        }
    }
}

impl std::ops::Index<usize> for Value {
    type Output = Value;

    #[track_caller]
    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(items) => match items.get(index) {
                Some(item) => item,
                None => panic!(
                    "index {index} out of bounds for array of length {}",
                    items.len()
                ),
            },
            other => panic!("cannot index {} with {index}", other.type_str()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::Datetime(t) => serde::Serialize::serialize(t, ser),
            Value::String(s) => ser.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = ser.serialize_seq(Some(arr.len()))?;
                for ele in arr {
                    seq.serialize_element(ele)?;
                }
                seq.end()
            }
            Value::Table(tab) => serde::Serialize::serialize(tab, ser),
        }
    }
}

/// A table key with its source span.
///
/// Keys appear as the first element in `(`[`Key`]`, `[`Value`]`)` entry
/// pairs when iterating over a [`Table`]. Two keys are equal when their names
/// are; the span only records where the key was written.
#[derive(Clone)]
pub struct Key {
    /// The key name, exactly as written. Dots in an assignment key are part
    /// of the name.
    pub name: String,
    /// The byte-offset span of the key in the source document.
    pub span: Span,
}

impl Key {
    pub fn new(name: impl Into<String>, span: Span) -> Key {
        Key {
            name: name.into(),
            span,
        }
    }

    /// Returns the key name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq(&other.name)
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.serialize_str(&self.name)
    }
}
