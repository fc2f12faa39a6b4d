//! Turns a parse tree into values and assembles the final table.
//!
//! Conversion is bottom-up and shape-directed: every [`Node`] variant has one
//! conversion, a flat assignment list folds into a table, and each group
//! becomes a single-branch nested table that is deep-merged into the result.

#[cfg(test)]
#[path = "./transform_tests.rs"]
mod tests;

use crate::tree::{Assignments, Document, Group, KeyValue, Node};
use crate::value::Key;
use crate::{Error, ErrorKind, Table, Timestamp, Value};
use tracing::trace;

pub(crate) struct Transform<'s> {
    src: &'s str,
}

impl<'s> Transform<'s> {
    /// `src` is only used to resolve error positions.
    pub(crate) fn new(src: &'s str) -> Self {
        Transform { src }
    }

    /// Converts the leading assignments into the root table, then merges each
    /// group into it in document order.
    pub(crate) fn document(&self, doc: Document<'_>) -> Result<Table, Error> {
        let mut root = self.assignments(doc.leading)?;
        for group in doc.groups {
            let table = self.group(group)?;
            self.merge(&mut root, table)?;
        }
        Ok(root)
    }

    /// Builds `a -> b -> c -> {assignments}` for a group named `a.b.c`.
    fn group(&self, group: Group<'_>) -> Result<Table, Error> {
        let mut table = self.assignments(group.assignments)?;
        let segments: Vec<_> = group.name.split_dotted().collect();
        for segment in segments.into_iter().rev() {
            let mut outer = Table::new();
            outer.insert(Key::new(segment.value, segment.span), Value::Table(table));
            table = outer;
        }
        Ok(table)
    }

    /// Folds an assignment list into one table. A repeated key overwrites the
    /// earlier entry.
    fn assignments(&self, assignments: Assignments<'_>) -> Result<Table, Error> {
        let mut table = Table::new();
        match assignments {
            Assignments::List(list) => {
                for KeyValue { key, value } in list {
                    let value = self.value(value)?;
                    table.insert(Key::new(key.value, key.span), value);
                }
            }
            Assignments::Empty(span) => {
                trace!(start = span.start, end = span.end, "no assignments");
            }
        }
        Ok(table)
    }

    fn value(&self, node: Node<'_>) -> Result<Value, Error> {
        let span = node.span();
        let value = match node {
            Node::Integer(text) => match text.value.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => {
                    return Err(Error::new(ErrorKind::OutOfRange("i64"), span, self.src));
                }
            },
            Node::Float(text) => match text.value.parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(err) => unreachable!("float rule matched {:?}: {err}", text.value),
            },
            Node::Boolean(text) => Value::Boolean(text.value == "true"),
            Node::DateTime(text) => match text.value.parse::<Timestamp>() {
                Ok(ts) => Value::Datetime(ts),
                Err(err) => unreachable!("datetime rule matched {:?}: {err}", text.value),
            },
            Node::StringLit(text) => Value::String(unescape(text.value)),
            Node::Array(items, _) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.value(item)?);
                }
                Value::Array(values)
            }
        };
        Ok(value)
    }

    /// Deep-merges `incoming` into `existing`.
    ///
    /// New keys are inserted, tables present on both sides are merged
    /// recursively, and any other collision is a reassignment reported at the
    /// incoming key.
    pub(crate) fn merge(&self, existing: &mut Table, incoming: Table) -> Result<(), Error> {
        for (key, value) in incoming {
            let Some((first, _)) = existing.get_key_value(&key.name) else {
                existing.insert(key, value);
                continue;
            };
            let first = first.span;
            match (existing.get_mut(&key.name), value) {
                (Some(Value::Table(current)), Value::Table(incoming)) => {
                    trace!(key = %key, "merging into existing table");
                    self.merge(current, incoming)?;
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::Reassign {
                            key: key.name,
                            first,
                        },
                        key.span,
                        self.src,
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Resolves escapes in a string body the grammar already validated.
///
/// `\xHH` yields the character U+00HH. Anything that is not a known escape is
/// passed through unchanged.
pub(crate) fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let rest = chars.as_str();
                let hex = rest
                    .get(..2)
                    .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()));
                match hex.and_then(|hex| u8::from_str_radix(hex, 16).ok()) {
                    Some(byte) => {
                        out.push(char::from(byte));
                        chars = rest[2..].chars();
                    }
                    None => out.push_str("\\x"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
