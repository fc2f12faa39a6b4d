//! The parse tree: every recognized construct tagged with its grammar role.
//!
//! Nodes borrow their text from the source and carry it unconverted; turning
//! text into values is the job of [`transform`](crate::transform).

use crate::Span;
use crate::span::Spanned;

/// A key or dotted group name, with the span it occupies in the source.
pub(crate) type SpannedStr<'a> = Spanned<&'a str>;

/// A value node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node<'a> {
    Integer(SpannedStr<'a>),
    Float(SpannedStr<'a>),
    Boolean(SpannedStr<'a>),
    DateTime(SpannedStr<'a>),
    /// String body between the quotes, escapes still in place.
    StringLit(SpannedStr<'a>),
    /// Elements share one kind; the grammar picks the kind before matching.
    Array(Vec<Node<'a>>, Span),
}

impl Node<'_> {
    pub(crate) fn span(&self) -> Span {
        match self {
            Node::Integer(s)
            | Node::Float(s)
            | Node::Boolean(s)
            | Node::DateTime(s)
            | Node::StringLit(s) => s.span,
            Node::Array(_, span) => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyValue<'a> {
    pub key: SpannedStr<'a>,
    pub value: Node<'a>,
}

/// A block of assignments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Assignments<'a> {
    List(Vec<KeyValue<'a>>),
    /// A region holding only blank and comment lines.
    Empty(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Group<'a> {
    /// The dot-joined name between the brackets.
    pub name: SpannedStr<'a>,
    pub assignments: Assignments<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Document<'a> {
    /// Assignments before the first group header.
    pub leading: Assignments<'a>,
    pub groups: Vec<Group<'a>>,
}
