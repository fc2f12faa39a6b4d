//! Byte-offset span types for source location tracking.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

use std::fmt;

/// A byte-offset range within a document.
///
/// Convertible to and from [`Range<u32>`](std::ops::Range) and
/// [`Range<usize>`](std::ops::Range).
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new [`Span`] from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a [`Span`] from `usize` offsets.
    ///
    /// Offsets always fit: [`load`](crate::load) rejects inputs larger than
    /// `u32::MAX` bytes before any span is produced.
    #[inline]
    pub(crate) fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(start as u32, end as u32)
    }

    /// Length of the span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the sub-span `offset..offset + len`, relative to the start of
    /// `self`.
    #[inline]
    pub(crate) fn sub(&self, offset: usize, len: usize) -> Span {
        let start = self.start + offset as u32;
        Span::new(start, start + len as u32)
    }
}

impl From<Span> for (u32, u32) {
    fn from(s: Span) -> (u32, u32) {
        (s.start, s.end)
    }
}

impl From<Span> for (usize, usize) {
    fn from(s: Span) -> (usize, usize) {
        (s.start as usize, s.end as usize)
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(s: std::ops::Range<u32>) -> Self {
        Self::new(s.start, s.end)
    }
}

impl From<Span> for std::ops::Range<u32> {
    fn from(s: Span) -> Self {
        s.start..s.end
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}

/// Resolves a byte offset into a 1-based `(line, column)` pair.
///
/// Columns count characters, not bytes. An offset past the end of `src`
/// resolves to the position just after the last character.
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(src.len());
    let before = &src[..floor_char_boundary(src, offset)];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn floor_char_boundary(src: &str, mut offset: usize) -> usize {
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Wraps a value `T` with its source [`Span`].
///
/// Dotted keys in the parse tree are `Spanned<&str>`; splitting one keeps
/// every segment pointing back into the original source.
///
/// # Examples
///
/// ```
/// use toml_peg::{Span, Spanned};
///
/// let name = Spanned::with_span("server", Span::new(1, 7));
/// assert_eq!(name.value, "server");
/// assert_eq!(name.span.len(), 6);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    #[inline]
    pub const fn with_span(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

impl<'a> Spanned<&'a str> {
    /// Splits a dotted name on `.`, trimming spaces and tabs around each
    /// segment. Every segment gets the sub-span of its trimmed text inside
    /// the original name.
    pub fn split_dotted(&self) -> impl Iterator<Item = Spanned<&'a str>> + '_ {
        let name: &'a str = self.value;
        let span = self.span;
        let mut offset = 0;
        name.split('.').map(move |segment| {
            let trimmed = segment.trim_start_matches([' ', '\t']);
            let padding = segment.len() - trimmed.len();
            let trimmed = trimmed.trim_end_matches([' ', '\t']);
            let sub = span.sub(offset + padding, trimmed.len());
            offset += segment.len() + 1;
            Spanned::with_span(trimmed, sub)
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}..{}", self.value, self.span.start, self.span.end)
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Spanned<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}
