//! A loader for a small TOML-like configuration language, built on an
//! ordered-choice grammar that reports the furthest point it reached when a
//! document does not parse.
//!
//! A document is a list of `key = value` assignments followed by `[group]`
//! sections. Dotted group names such as `[server.http]` nest tables, and
//! repeated groups are merged as long as no key is assigned twice. Every key
//! in the resulting [`Table`] remembers its [`Span`] in the source, so both
//! syntax errors and reassignments can be reported precisely.
//!
//! # Examples
//!
//! ```
//! use toml_peg::{Error, Value};
//!
//! let content = r#"
//! title = "global title"
//!
//! [group1]
//! a = 1
//! b = 2
//!
//! [group2]
//! c = [3, 4]
//! "#;
//!
//! let table = toml_peg::load(content)?;
//!
//! assert_eq!(table["title"].as_str(), Some("global title"));
//! assert_eq!(table["group1"]["b"].as_i64(), Some(2));
//! assert_eq!(
//!     table["group2"]["c"],
//!     Value::Array(vec![Value::Integer(3), Value::Integer(4)])
//! );
//! # Ok::<(), Error>(())
//! ```
//!
//! Errors carry a line and column:
//!
//! ```
//! let err = toml_peg::load("a = 1\nb = nope").unwrap_err();
//! assert_eq!(err.to_string(), "unexpected input at line 2 column 5, expected a value");
//! ```

mod error;
mod grammar;
mod load;
mod parser;
mod span;
mod table;
mod time;
mod transform;
mod tree;
mod value;

pub use error::{Error, ErrorKind};
pub use load::{Loader, load};
pub use span::{Span, Spanned};
pub use table::Table;
pub use time::{InvalidTimestamp, Timestamp};
pub use value::{Key, Value};
