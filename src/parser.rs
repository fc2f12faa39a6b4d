//! The document grammar, expressed with the combinators from
//! [`grammar`](crate::grammar).
//!
//! Rule order matters wherever a [`Choice`] is built: the first alternative
//! that matches wins, and nothing after it is tried. Two orders in particular
//! are load-bearing:
//!
//! - array element kinds are tried as datetime, integer, float, boolean,
//!   string, array. A datetime starts with digits, so trying integers first
//!   would cut `1979-05-27T07:32:00Z` down to `1979` and fail the array.
//! - scalar values in an assignment try float before integer, otherwise
//!   `3.14` would match as `3` and leave `.14` behind.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::Span;
use crate::grammar::{Attempt, Choice, Failure, Input, Seq, absent, maybe, repeat};
use crate::time::Timestamp;
use crate::tree::{Assignments, Document, Group, KeyValue, Node, SpannedStr};
use std::cell::Cell;

/// Default bound on how deeply arrays may nest.
pub(crate) const DEFAULT_MAX_ARRAY_DEPTH: usize = 64;

pub(crate) struct Parser<'a> {
    input: Input<'a>,
    max_array_depth: usize,
    array_depth: Cell<usize>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, max_array_depth: usize) -> Self {
        Parser {
            input: Input::new(src),
            max_array_depth,
            array_depth: Cell::new(0),
        }
    }

    /// Parses the whole input as a document.
    pub(crate) fn parse(&self) -> Result<Document<'a>, Failure> {
        self.document(0).map(|(doc, _)| doc)
    }

    // -- layout -------------------------------------------------------------

    /// Spaces and tabs. Never fails.
    fn ws(&self, pos: usize) -> Attempt<()> {
        repeat(&self.input, pos, 0, "whitespace", |p| {
            self.input.char_where(p, "whitespace", |c| c == ' ' || c == '\t')
        })
        .map(|(_, end)| ((), end))
    }

    fn newline(&self, pos: usize) -> Attempt<()> {
        Choice::new(&self.input, pos, "a newline")
            .or(|p| self.input.literal(p, "\n"))
            .or(|p| self.input.literal(p, "\r\n"))
            .finish()
    }

    /// A line break, or the end of the input on the last line.
    fn line_end(&self, pos: usize) -> Attempt<()> {
        Choice::new(&self.input, pos, "a line break")
            .or(|p| self.newline(p))
            .or(|p| self.input.at_end(p))
            .finish()
    }

    /// `#` up to, not including, the end of the line.
    fn comment(&self, pos: usize) -> Attempt<()> {
        let mut seq = Seq::new(pos, "a comment");
        seq.then(|p| self.input.literal(p, "#"))?;
        seq.then(|p| {
            repeat(&self.input, p, 0, "comment text", |p| {
                let mut seq = Seq::new(p, "comment text");
                seq.then(|p| absent(p, "the end of the line", |p| self.newline(p)))?;
                seq.then(|p| self.input.char_where(p, "a character", |_| true))?;
                seq.finish(())
            })
        })?;
        seq.finish(())
    }

    /// Blank and comment-only lines, each with its line break. The last line
    /// of the input needs none.
    fn filler(&self, pos: usize) -> Attempt<()> {
        repeat(&self.input, pos, 0, "blank lines", |p| {
            let mut seq = Seq::new(p, "a blank line");
            seq.then(|p| self.ws(p))?;
            seq.then(|p| maybe(&self.input, p, |p| self.comment(p)))?;
            seq.then(|p| self.line_end(p))?;
            seq.finish(())
        })
        .map(|(_, end)| ((), end))
    }

    /// Whitespace, line breaks and comments between array elements.
    fn array_space(&self, pos: usize) -> Attempt<()> {
        repeat(&self.input, pos, 0, "array whitespace", |p| {
            Choice::new(&self.input, p, "array whitespace")
                .or(|p| {
                    self.input
                        .char_where(p, "whitespace", |c| c == ' ' || c == '\t')
                        .map(|(_, end)| ((), end))
                })
                .or(|p| self.newline(p))
                .or(|p| self.comment(p))
                .finish()
        })
        .map(|(_, end)| ((), end))
    }

    // -- scalars ------------------------------------------------------------

    fn digit(&self, pos: usize) -> Attempt<char> {
        self.input.char_where(pos, "a digit", |c| c.is_ascii_digit())
    }

    /// Optional `-`, a non-zero digit, then any digits.
    fn integer(&self, pos: usize) -> Attempt<Node<'a>> {
        let (text, end) = self.input.capture(pos, |p| {
            let mut seq = Seq::new(p, "an integer");
            seq.then(|p| maybe(&self.input, p, |p| self.input.literal(p, "-")))?;
            seq.then(|p| {
                self.input
                    .char_where(p, "a non-zero digit", |c| matches!(c, '1'..='9'))
            })?;
            seq.then(|p| repeat(&self.input, p, 0, "digits", |p| self.digit(p)))?;
            seq.finish(())
        })?;
        Ok((Node::Integer(text), end))
    }

    /// Optional `-`, digits, `.`, digits.
    fn float(&self, pos: usize) -> Attempt<Node<'a>> {
        let (text, end) = self.input.capture(pos, |p| {
            let mut seq = Seq::new(p, "a float");
            seq.then(|p| maybe(&self.input, p, |p| self.input.literal(p, "-")))?;
            seq.then(|p| repeat(&self.input, p, 1, "digits", |p| self.digit(p)))?;
            seq.then(|p| self.input.literal(p, "."))?;
            seq.then(|p| repeat(&self.input, p, 1, "digits", |p| self.digit(p)))?;
            seq.finish(())
        })?;
        Ok((Node::Float(text), end))
    }

    fn boolean(&self, pos: usize) -> Attempt<Node<'a>> {
        let (text, end) = self.input.capture(pos, |p| {
            Choice::new(&self.input, p, "a boolean")
                .or(|p| self.input.literal(p, "true"))
                .or(|p| self.input.literal(p, "false"))
                .finish()
        })?;
        Ok((Node::Boolean(text), end))
    }

    /// The fixed `YYYY-MM-DDTHH:MM:SSZ` form, with calendar ranges checked.
    fn datetime(&self, pos: usize) -> Attempt<Node<'a>> {
        match Timestamp::munch(self.input.rest(pos).as_bytes()) {
            Some((len, _)) => {
                let end = pos + len;
                Ok((Node::DateTime(self.input.spanned(pos, end)), end))
            }
            None => Err(Failure::leaf(pos, "a datetime")),
        }
    }

    /// `\0 \t \n \r \" \\` or `\xHH`.
    fn escape(&self, pos: usize) -> Attempt<()> {
        let mut seq = Seq::new(pos, "an escape sequence");
        seq.then(|p| self.input.literal(p, "\\"))?;
        seq.then(|p| {
            Choice::new(&self.input, p, "an escape character")
                .or(|p| {
                    self.input
                        .char_where(p, "an escape character", |c| {
                            matches!(c, '0' | 't' | 'n' | 'r' | '"' | '\\')
                        })
                        .map(|(_, end)| ((), end))
                })
                .or(|p| {
                    let mut seq = Seq::new(p, "a hex escape");
                    seq.then(|p| self.input.literal(p, "x"))?;
                    for _ in 0..2 {
                        seq.then(|p| {
                            self.input
                                .char_where(p, "a hex digit", |c| c.is_ascii_hexdigit())
                        })?;
                    }
                    seq.finish(())
                })
                .finish()
        })?;
        seq.finish(())
    }

    /// A double-quoted string. The node holds the body with escapes intact.
    fn string(&self, pos: usize) -> Attempt<Node<'a>> {
        let mut seq = Seq::new(pos, "a string");
        seq.then(|p| self.input.literal(p, "\""))?;
        let body = seq.then(|p| {
            self.input.capture(p, |p| {
                repeat(&self.input, p, 0, "string characters", |p| {
                    Choice::new(&self.input, p, "a string character")
                        .or(|p| self.escape(p))
                        .or(|p| {
                            self.input
                                .char_where(p, "a string character", |c| {
                                    !matches!(c, '\0' | '\t' | '\n' | '\r' | '"' | '\\')
                                })
                                .map(|(_, end)| ((), end))
                        })
                        .finish()
                })
            })
        })?;
        seq.then(|p| self.input.literal(p, "\""))?;
        seq.finish(Node::StringLit(body))
    }

    // -- arrays -------------------------------------------------------------

    /// `[`, then one or more elements of a single kind, `]`.
    fn array(&self, pos: usize) -> Attempt<Node<'a>> {
        let depth = self.array_depth.get();
        if depth >= self.max_array_depth {
            return Err(Failure::leaf(pos, "a less deeply nested array"));
        }
        self.array_depth.set(depth + 1);
        let result = Choice::new(&self.input, pos, "an array")
            .or(|p| self.array_of(p, "an array of datetimes", |p| self.datetime(p)))
            .or(|p| self.array_of(p, "an array of integers", |p| self.integer(p)))
            .or(|p| self.array_of(p, "an array of floats", |p| self.float(p)))
            .or(|p| self.array_of(p, "an array of booleans", |p| self.boolean(p)))
            .or(|p| self.array_of(p, "an array of strings", |p| self.string(p)))
            .or(|p| self.array_of(p, "an array of arrays", |p| self.array(p)))
            .finish();
        self.array_depth.set(depth);
        result
    }

    fn array_of(
        &self,
        pos: usize,
        expected: &'static str,
        element: impl Fn(usize) -> Attempt<Node<'a>>,
    ) -> Attempt<Node<'a>> {
        let mut seq = Seq::new(pos, expected);
        seq.then(|p| self.input.literal(p, "["))?;
        seq.then(|p| self.array_space(p))?;
        let first = seq.then(&element)?;
        let rest = seq.then(|p| {
            repeat(&self.input, p, 0, "more elements", |p| {
                let mut seq = Seq::new(p, "an array element");
                seq.then(|p| self.array_space(p))?;
                seq.then(|p| self.input.literal(p, ","))?;
                seq.then(|p| self.array_space(p))?;
                let item = seq.then(&element)?;
                seq.finish(item)
            })
        })?;
        seq.then(|p| {
            maybe(&self.input, p, |p| {
                let mut seq = Seq::new(p, "a trailing comma");
                seq.then(|p| self.array_space(p))?;
                seq.then(|p| self.input.literal(p, ","))?;
                seq.finish(())
            })
        })?;
        seq.then(|p| self.array_space(p))?;
        seq.then(|p| self.input.literal(p, "]"))?;

        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        let span = seq.span();
        seq.finish(Node::Array(items, span))
    }

    // -- assignments --------------------------------------------------------

    fn value(&self, pos: usize) -> Attempt<Node<'a>> {
        Choice::new(&self.input, pos, "a value")
            .or(|p| self.datetime(p))
            .or(|p| self.float(p))
            .or(|p| self.integer(p))
            .or(|p| self.boolean(p))
            .or(|p| self.string(p))
            .or(|p| self.array(p))
            .finish()
    }

    /// One or more characters other than brackets, `=` and whitespace. Dots
    /// are part of the key.
    fn key(&self, pos: usize) -> Attempt<SpannedStr<'a>> {
        self.input.capture(pos, |p| {
            repeat(&self.input, p, 1, "a key", |p| {
                self.input.char_where(p, "a key character", |c| {
                    !matches!(c, '[' | ']' | '=') && !c.is_whitespace()
                })
            })
        })
    }

    fn assignment(&self, pos: usize) -> Attempt<KeyValue<'a>> {
        let mut seq = Seq::new(pos, "an assignment");
        seq.then(|p| self.ws(p))?;
        let key = seq.then(|p| self.key(p))?;
        seq.then(|p| self.ws(p))?;
        seq.then(|p| self.input.literal(p, "="))?;
        seq.then(|p| self.ws(p))?;
        let value = seq.then(|p| self.value(p))?;
        seq.then(|p| self.ws(p))?;
        seq.then(|p| maybe(&self.input, p, |p| self.comment(p)))?;
        seq.finish(KeyValue { key, value })
    }

    /// Assignments separated by line breaks, with blank and comment lines in
    /// between. The trailing line break is consumed too.
    fn assignment_list(&self, pos: usize) -> Attempt<Vec<KeyValue<'a>>> {
        let mut seq = Seq::new(pos, "assignments");
        seq.then(|p| self.filler(p))?;
        let first = seq.then(|p| self.assignment(p))?;
        let rest = seq.then(|p| {
            repeat(&self.input, p, 0, "more assignments", |p| {
                let mut seq = Seq::new(p, "an assignment line");
                seq.then(|p| self.newline(p))?;
                seq.then(|p| self.filler(p))?;
                let kv = seq.then(|p| self.assignment(p))?;
                seq.finish(kv)
            })
        })?;
        seq.then(|p| {
            maybe(&self.input, p, |p| {
                let mut seq = Seq::new(p, "a line break");
                seq.then(|p| self.newline(p))?;
                seq.then(|p| self.filler(p))?;
                seq.finish(())
            })
        })?;

        let mut list = Vec::with_capacity(rest.len() + 1);
        list.push(first);
        list.extend(rest);
        seq.finish(list)
    }

    /// An assignment list, or a region of only blank and comment lines.
    fn assignments(&self, pos: usize) -> Attempt<Assignments<'a>> {
        Choice::new(&self.input, pos, "assignments")
            .or(|p| {
                self.assignment_list(p)
                    .map(|(list, end)| (Assignments::List(list), end))
            })
            .or(|p| {
                self.filler(p)
                    .map(|(_, end)| (Assignments::Empty(Span::from_offsets(p, end)), end))
            })
            .finish()
    }

    // -- groups -------------------------------------------------------------

    /// Segments joined by `.`. A segment is one or more words separated by
    /// spaces or tabs, and may be padded with blanks on either side.
    fn group_name(&self, pos: usize) -> Attempt<SpannedStr<'a>> {
        let word = |p: usize| {
            repeat(&self.input, p, 1, "a group name segment", |p| {
                self.input.char_where(p, "a group name character", |c| {
                    !matches!(c, '[' | ']' | '.' | '\n' | '\r' | ' ' | '\t')
                })
            })
        };
        let segment = |p: usize| {
            let mut seq = Seq::new(p, "a group name segment");
            seq.then(|p| self.ws(p))?;
            seq.then(word)?;
            seq.then(|p| {
                repeat(&self.input, p, 0, "more words", |p| {
                    let mut seq = Seq::new(p, "a spaced word");
                    seq.then(|p| self.ws(p))?;
                    seq.then(word)?;
                    seq.finish(())
                })
            })?;
            seq.then(|p| self.ws(p))?;
            seq.finish(())
        };
        self.input.capture(pos, |p| {
            let mut seq = Seq::new(p, "a group name");
            seq.then(segment)?;
            seq.then(|p| {
                repeat(&self.input, p, 0, "more segments", |p| {
                    let mut seq = Seq::new(p, "a dotted segment");
                    seq.then(|p| self.input.literal(p, "."))?;
                    seq.then(segment)?;
                    seq.finish(())
                })
            })?;
            seq.finish(())
        })
    }

    /// A header on a line of its own, then its assignments.
    fn group(&self, pos: usize) -> Attempt<Group<'a>> {
        let mut seq = Seq::new(pos, "a group");
        seq.then(|p| self.input.line_start(p))?;
        seq.then(|p| self.ws(p))?;
        seq.then(|p| self.input.literal(p, "["))?;
        let name = seq.then(|p| self.group_name(p))?;
        seq.then(|p| self.input.literal(p, "]"))?;
        seq.then(|p| self.ws(p))?;
        seq.then(|p| maybe(&self.input, p, |p| self.comment(p)))?;
        seq.then(|p| self.line_end(p))?;
        let assignments = seq.then(|p| self.assignments(p))?;
        seq.finish(Group { name, assignments })
    }

    fn document(&self, pos: usize) -> Attempt<Document<'a>> {
        let mut seq = Seq::new(pos, "a document");
        let leading = seq.then(|p| self.assignments(p))?;
        let groups = seq.then(|p| repeat(&self.input, p, 0, "groups", |p| self.group(p)))?;
        seq.then(|p| self.ws(p))?;
        seq.then(|p| maybe(&self.input, p, |p| self.comment(p)))?;
        seq.then(|p| self.input.end(p))?;
        seq.finish(Document { leading, groups })
    }
}
