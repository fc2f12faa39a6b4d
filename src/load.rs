#[cfg(test)]
#[path = "./load_tests.rs"]
mod tests;

use crate::parser::{DEFAULT_MAX_ARRAY_DEPTH, Parser};
use crate::transform::Transform;
use crate::{Error, ErrorKind, Span, Table};
use tracing::debug;

/// Loads a document with the default [`Loader`] settings.
///
/// # Examples
///
/// ```
/// let table = toml_peg::load("title = \"example\"\n[owner.db]\nport = 5432")?;
/// assert_eq!(table["title"].as_str(), Some("example"));
/// assert_eq!(table["owner"]["db"]["port"].as_i64(), Some(5432));
/// # Ok::<(), toml_peg::Error>(())
/// ```
pub fn load(text: &str) -> Result<Table, Error> {
    Loader::default().load(text)
}

/// Configurable entry point.
///
/// ```
/// use toml_peg::Loader;
///
/// let loader = Loader::new().max_array_depth(2);
/// assert!(loader.load("a = [[1]]").is_ok());
/// assert!(loader.load("a = [[[1]]]").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Loader {
    max_array_depth: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Loader {
            max_array_depth: DEFAULT_MAX_ARRAY_DEPTH,
        }
    }
}

impl Loader {
    pub fn new() -> Loader {
        Loader::default()
    }

    /// Sets how deeply arrays may nest (64 by default). Deeper nesting is
    /// reported as a syntax error at the `[` that exceeds the limit.
    pub fn max_array_depth(mut self, depth: usize) -> Loader {
        self.max_array_depth = depth;
        self
    }

    /// Parses `text` and converts it into a table.
    ///
    /// Syntax errors point at the deepest position the grammar reached.
    /// Reassignment errors point at the second definition of the key.
    pub fn load(&self, text: &str) -> Result<Table, Error> {
        debug!(len = text.len(), "loading document");
        if text.len() > u32::MAX as usize {
            // spans hold u32 offsets
            return Err(Error {
                kind: ErrorKind::FileTooLarge,
                span: Span::default(),
                line: 1,
                column: 1,
            });
        }

        let result = match Parser::new(text, self.max_array_depth).parse() {
            Ok(doc) => Transform::new(text).document(doc),
            Err(failure) => {
                let leaf = failure.deepest();
                let end = text[leaf.pos..]
                    .chars()
                    .next()
                    .map_or(leaf.pos, |c| leaf.pos + c.len_utf8());
                Err(Error::new(
                    ErrorKind::Unexpected {
                        expected: leaf.expected,
                    },
                    Span::from_offsets(leaf.pos, end),
                    text,
                ))
            }
        };

        match &result {
            Ok(table) => debug!(keys = table.len(), "loaded document"),
            Err(err) => debug!(
                kind = %err.kind,
                line = err.line,
                column = err.column,
                "failed to load document"
            ),
        }
        result
    }
}
