//! Classified units of path syntax.

use std::fmt;

/// One chunk of a path expression, as produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// No characters remain.
    Empty,
    /// A `.` separator.
    Dot,
    /// A decimal index, kept as text until the evaluator parses it.
    Index(String),
    /// A bare or quoted member name.
    Member(String),
    /// `[*]`
    Star,
    /// Unparsed predicate expression from inside `[...]`.
    Brace(String),
    /// `name()`
    Function(String),
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Empty => write!(f, "end of path"),
            Chunk::Dot => write!(f, "."),
            Chunk::Index(literal) => write!(f, "[{}]", literal),
            Chunk::Member(name) => write!(f, "{:?}", name),
            Chunk::Star => write!(f, "[*]"),
            Chunk::Brace(expression) => write!(f, "[{}]", expression),
            Chunk::Function(name) => write!(f, "{}()", name),
        }
    }
}
