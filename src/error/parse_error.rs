use thiserror::Error;

use crate::error::LexicalError;

/// Represents all errors that can occur while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The next token does not fit the grammar.
    ///
    /// `expected` and `found` are upper-case token names such as `LBRACE`
    /// or `EOF`.
    #[error("[Parser Error] Line {line}:{column} - Expected {expected}, got {found}")]
    Expected {
        /// What the grammar allows here.
        expected: String,
        /// The token that was found instead.
        found:    String,
        /// Line of the found token.
        line:     usize,
        /// Column of the found token.
        column:   usize,
    },
}

impl ParseError {
    /// Line of the offending token.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Expected { line, .. } => *line,
        }
    }

    /// Column of the offending token.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::Expected { column, .. } => *column,
        }
    }
}

/// Any failure before execution starts.
///
/// Lexing and parsing both abort immediately, so a program either parses
/// completely or produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// Tokenizing failed.
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    /// `(line, column)` of the failure.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::Lexical(e) => (e.line, e.column),
            Self::Parse(e) => (e.line(), e.column()),
        }
    }
}
