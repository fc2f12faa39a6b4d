//! Composable parsing rules.
//!
//! Every rule has the same shape: given a byte position into the [`Input`],
//! it either matches, yielding a value and the position after the match, or
//! fails with a [`Failure`] tree describing what was attempted. Rules are
//! combined explicitly through [`Seq`], [`Choice`], [`repeat`], [`maybe`] and
//! [`absent`]; there is no backtracking other than what ordered choice and
//! repetition imply.

#[cfg(test)]
#[path = "./grammar_tests.rs"]
mod tests;

use crate::span::{Span, Spanned};
use std::cell::RefCell;
use std::cmp::Reverse;

/// The outcome of trying a rule: the produced value and the next position, or
/// the reason it did not match.
pub(crate) type Attempt<T> = Result<(T, usize), Failure>;

// ---------------------------------------------------------------------------
// Failure trees
// ---------------------------------------------------------------------------

/// Why a rule did not match.
///
/// A failure records the position the rule started at and the failures of
/// the sub-rules it attempted there. Leaves are terminal mismatches.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Failure {
    pub pos: usize,
    pub expected: &'static str,
    pub children: Vec<Failure>,
}

impl Failure {
    pub(crate) fn leaf(pos: usize, expected: &'static str) -> Failure {
        Failure {
            pos,
            expected,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(
        pos: usize,
        expected: &'static str,
        children: Vec<Failure>,
    ) -> Failure {
        Failure {
            pos,
            expected,
            children,
        }
    }

    /// Failure of a compound rule that started at `pos`.
    ///
    /// If none of `children` got past `pos`, the rule as a whole is the best
    /// explanation and the result is a leaf labeled `expected`.
    pub(crate) fn labeled(pos: usize, expected: &'static str, children: Vec<Failure>) -> Failure {
        if children.iter().all(|child| child.furthest() <= pos) {
            Failure::leaf(pos, expected)
        } else {
            Failure::with_children(pos, expected, children)
        }
    }

    /// Follows the first child until a leaf is reached.
    pub(crate) fn deepest(&self) -> &Failure {
        let mut current = self;
        while let Some(first) = current.children.first() {
            current = first;
        }
        current
    }

    /// Position of the [`deepest`](Self::deepest) leaf.
    pub(crate) fn furthest(&self) -> usize {
        self.deepest().pos
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The text being parsed plus the furthest failure seen so far.
///
/// Failures that a repetition, an option or a successful choice swallowed are
/// kept here so that trailing garbage can be explained by the deepest point
/// the grammar reached, not just by where matching stopped.
pub(crate) struct Input<'a> {
    src: &'a str,
    deepest: RefCell<Option<Failure>>,
}

impl<'a> Input<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Input {
            src,
            deepest: RefCell::new(None),
        }
    }

    #[inline]
    pub(crate) fn rest(&self, pos: usize) -> &'a str {
        &self.src[pos..]
    }

    /// Slice of the source covered by `start..end`, paired with its span.
    pub(crate) fn spanned(&self, start: usize, end: usize) -> Spanned<&'a str> {
        Spanned::with_span(&self.src[start..end], Span::from_offsets(start, end))
    }

    // -- terminals ----------------------------------------------------------

    /// Matches the exact text `lit`.
    pub(crate) fn literal(&self, pos: usize, lit: &'static str) -> Attempt<()> {
        if self.rest(pos).starts_with(lit) {
            Ok(((), pos + lit.len()))
        } else {
            Err(Failure::leaf(pos, describe(lit)))
        }
    }

    /// Matches a single character accepted by `pred`.
    pub(crate) fn char_where(
        &self,
        pos: usize,
        expected: &'static str,
        pred: impl Fn(char) -> bool,
    ) -> Attempt<char> {
        match self.rest(pos).chars().next() {
            Some(c) if pred(c) => Ok((c, pos + c.len_utf8())),
            _ => Err(Failure::leaf(pos, expected)),
        }
    }

    /// Matches only at the end of the input.
    ///
    /// On failure, the deepest swallowed failure that got at least this far
    /// becomes the only child, so descending the tree lands on it.
    pub(crate) fn end(&self, pos: usize) -> Attempt<()> {
        if pos >= self.src.len() {
            return Ok(((), pos));
        }
        let children = match self.deepest.borrow_mut().take() {
            Some(failure) if failure.furthest() >= pos => vec![failure],
            _ => Vec::new(),
        };
        Err(Failure::with_children(pos, "end of input", children))
    }

    /// Matches without consuming at the end of the input. Unlike
    /// [`end`](Self::end), a mismatch is a plain leaf.
    pub(crate) fn at_end(&self, pos: usize) -> Attempt<()> {
        if pos >= self.src.len() {
            Ok(((), pos))
        } else {
            Err(Failure::leaf(pos, "end of input"))
        }
    }

    /// Matches without consuming at the first byte of a line.
    pub(crate) fn line_start(&self, pos: usize) -> Attempt<()> {
        if pos == 0 || self.src[..pos].ends_with('\n') {
            Ok(((), pos))
        } else {
            Err(Failure::leaf(pos, "the start of a line"))
        }
    }

    /// Runs `rule` and yields the text it matched instead of its value.
    pub(crate) fn capture<T>(
        &self,
        pos: usize,
        rule: impl FnOnce(usize) -> Attempt<T>,
    ) -> Attempt<Spanned<&'a str>> {
        let (_, end) = rule(pos)?;
        Ok((self.spanned(pos, end), end))
    }

    /// Remembers a swallowed `failure` of a rule attempted at `start`.
    ///
    /// Only failures that got past `start` are kept, and only if they got
    /// further than anything recorded so far.
    pub(crate) fn record(&self, start: usize, failure: Failure) {
        if failure.furthest() <= start {
            return;
        }
        let mut deepest = self.deepest.borrow_mut();
        let further = match &*deepest {
            Some(current) => failure.furthest() > current.furthest(),
            None => true,
        };
        if further {
            *deepest = Some(failure);
        }
    }
}

/// Human readable name of a literal, used in error messages.
fn describe(lit: &'static str) -> &'static str {
    match lit {
        "\n" | "\r\n" => "a newline",
        "=" => "an equals",
        "." => "a period",
        "," => "a comma",
        "-" => "a minus sign",
        "#" => "a comment",
        "[" => "a left bracket",
        "]" => "a right bracket",
        "\"" => "a quote",
        "\\" => "a backslash",
        "true" => "`true`",
        "false" => "`false`",
        _ => lit,
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Sequencing: each step starts where the previous one ended, and the first
/// step that fails aborts the whole sequence.
///
/// ```ignore
/// let mut seq = Seq::new(pos, "an assignment");
/// let key = seq.then(|p| self.key(p))?;
/// seq.then(|p| self.input.literal(p, "="))?;
/// let value = seq.then(|p| self.value(p))?;
/// seq.finish(KeyValue { key, value })
/// ```
pub(crate) struct Seq {
    start: usize,
    pos: usize,
    expected: &'static str,
}

impl Seq {
    pub(crate) fn new(start: usize, expected: &'static str) -> Seq {
        Seq {
            start,
            pos: start,
            expected,
        }
    }

    /// Runs the next step. A failing step is wrapped in a failure for the
    /// whole sequence, anchored at the sequence start.
    pub(crate) fn then<T>(&mut self, rule: impl FnOnce(usize) -> Attempt<T>) -> Result<T, Failure> {
        match rule(self.pos) {
            Ok((value, next)) => {
                self.pos = next;
                Ok(value)
            }
            Err(cause) => Err(Failure::labeled(self.start, self.expected, vec![cause])),
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn span(&self) -> Span {
        Span::from_offsets(self.start, self.pos)
    }

    pub(crate) fn finish<T>(self, value: T) -> Attempt<T> {
        Ok((value, self.pos))
    }
}

/// Ordered choice: alternatives are tried in the order they are added and the
/// first match wins. Later alternatives are never tried once one matched.
///
/// When every alternative fails, the failure lists them ordered by how far
/// each one got (ties keep declaration order), so following first children
/// leads to the alternative with the greatest progress. If none got past the
/// start, the choice fails as a single leaf under its own label.
pub(crate) struct Choice<'i, 'a, T> {
    input: &'i Input<'a>,
    start: usize,
    expected: &'static str,
    causes: Vec<Failure>,
    matched: Option<(T, usize)>,
}

impl<'i, 'a, T> Choice<'i, 'a, T> {
    pub(crate) fn new(input: &'i Input<'a>, start: usize, expected: &'static str) -> Self {
        Choice {
            input,
            start,
            expected,
            causes: Vec::new(),
            matched: None,
        }
    }

    pub(crate) fn or(mut self, rule: impl FnOnce(usize) -> Attempt<T>) -> Self {
        if self.matched.is_none() {
            match rule(self.start) {
                Ok(matched) => self.matched = Some(matched),
                Err(cause) => self.causes.push(cause),
            }
        }
        self
    }

    pub(crate) fn finish(self) -> Attempt<T> {
        let Choice {
            input,
            start,
            expected,
            mut causes,
            matched,
        } = self;
        match matched {
            Some(matched) => {
                for cause in causes {
                    input.record(start, cause);
                }
                Ok(matched)
            }
            None => {
                causes.sort_by_key(|cause| Reverse(cause.furthest()));
                Err(Failure::labeled(start, expected, causes))
            }
        }
    }
}

/// Repetition: matches `rule` as many times as possible, requiring at least
/// `min` matches. Stops early if a match consumes nothing.
pub(crate) fn repeat<T>(
    input: &Input<'_>,
    pos: usize,
    min: usize,
    expected: &'static str,
    rule: impl Fn(usize) -> Attempt<T>,
) -> Attempt<Vec<T>> {
    let mut items = Vec::new();
    let mut cursor = pos;
    loop {
        match rule(cursor) {
            Ok((item, next)) => {
                items.push(item);
                if next == cursor {
                    break;
                }
                cursor = next;
            }
            Err(cause) => {
                if items.len() < min {
                    return Err(Failure::labeled(pos, expected, vec![cause]));
                }
                input.record(cursor, cause);
                break;
            }
        }
    }
    Ok((items, cursor))
}

/// Optional match: never fails.
pub(crate) fn maybe<T>(
    input: &Input<'_>,
    pos: usize,
    rule: impl FnOnce(usize) -> Attempt<T>,
) -> Attempt<Option<T>> {
    match rule(pos) {
        Ok((value, next)) => Ok((Some(value), next)),
        Err(cause) => {
            input.record(pos, cause);
            Ok((None, pos))
        }
    }
}

/// Negative lookahead: succeeds without consuming input when `rule` does not
/// match at `pos`.
pub(crate) fn absent<T>(
    pos: usize,
    expected: &'static str,
    rule: impl FnOnce(usize) -> Attempt<T>,
) -> Attempt<()> {
    match rule(pos) {
        Ok(_) => Err(Failure::leaf(pos, expected)),
        Err(_) => Ok(((), pos)),
    }
}
