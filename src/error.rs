use crate::Span;
use crate::span::line_col;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error returned by [`load`](crate::load).
///
/// Every error carries the byte span it refers to together with the 1-based
/// line and column of the span start. Columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The span where the error occurs.
    ///
    /// For syntax errors this is the point the grammar got furthest to; for
    /// reassignments it is the second, conflicting, definition.
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: usize,
    /// 1-based column of `span.start`, in characters.
    pub column: usize,
}

impl std::error::Error for Error {}

impl Error {
    /// Builds an error, resolving the line and column of `span` within `src`.
    pub(crate) fn new(kind: ErrorKind, span: Span, src: &str) -> Error {
        let (line, column) = line_col(src, span.start as usize);
        Error {
            kind,
            span,
            line,
            column,
        }
    }

    /// Returns `true` if the input did not match the grammar.
    pub fn is_syntax(&self) -> bool {
        !self.is_conflict()
    }

    /// Returns `true` if the input was well formed but defined the same key
    /// twice with incompatible shapes.
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, ErrorKind::Reassign { .. })
    }
}

/// What went wrong.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// The input does not match the grammar.
    Unexpected {
        /// Name of the grammar rule that failed at the deepest point reached.
        expected: &'static str,
    },

    /// An integer literal does not fit the target type.
    OutOfRange(&'static str),

    /// The input is larger than the maximum supported size of 4GiB.
    FileTooLarge,

    /// A key was bound a second time with an incompatible shape: a value over
    /// a value, a value over a table, or a table over a value.
    Reassign {
        /// The key being rebound
        key: String,
        /// The span of the earlier binding
        first: Span,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unexpected { .. } => "unexpected-input",
            Self::OutOfRange(_) => "out-of-range",
            Self::FileTooLarge => "file-too-large",
            Self::Reassign { .. } => "reassign",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = (self.line, self.column);
        match &self.kind {
            ErrorKind::Unexpected { expected } => write!(
                f,
                "unexpected input at line {line} column {column}, expected {expected}"
            ),
            ErrorKind::OutOfRange(kind) => write!(
                f,
                "number at line {line} column {column} is out of range of '{kind}'"
            ),
            ErrorKind::FileTooLarge => f.write_str("file is too large (maximum 4GiB)"),
            ErrorKind::Reassign { key, .. } => write!(
                f,
                "cannot reassign key `{key}` at line {line} column {column}"
            ),
        }
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`]
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        let diag =
            codespan_reporting::diagnostic::Diagnostic::error().with_code(self.kind.to_string());

        use codespan_reporting::diagnostic::Label;

        match &self.kind {
            ErrorKind::Unexpected { expected } => diag
                .with_message("unexpected input")
                .with_labels(vec![
                    Label::primary(fid, self.span).with_message(format!("expected {expected}")),
                ]),
            ErrorKind::OutOfRange(kind) => diag
                .with_message(format!("number is out of range of '{kind}'"))
                .with_labels(vec![Label::primary(fid, self.span)]),
            ErrorKind::FileTooLarge => diag
                .with_message("file is too large (maximum 4GiB)")
                .with_labels(vec![Label::primary(fid, self.span)]),
            ErrorKind::Reassign { key, first } => diag
                .with_message(format!("cannot reassign key `{key}`"))
                .with_labels(vec![
                    Label::secondary(fid, *first).with_message("first defined here"),
                    Label::primary(fid, self.span).with_message("reassigned here"),
                ]),
        }
    }
}
