use thiserror::Error;

/// What went wrong while tokenizing.
///
/// This is also the logos error type; `Default` stands for an unrecognized
/// character and is filled in with the offending character afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that starts no token.
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// A string literal that reaches the end of input.
    #[error("Unterminated string")]
    UnterminatedString,
    /// A `/*` comment without a closing `*/`.
    #[error("Unterminated block comment")]
    UnterminatedComment,
    /// A numeric literal that does not fit the number types.
    #[error("Invalid number literal")]
    InvalidNumber,
}

impl Default for LexErrorKind {
    fn default() -> Self {
        Self::UnexpectedCharacter('\0')
    }
}

/// A lexical error with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Lexer Error] Line {line}:{column} - {kind}")]
pub struct LexicalError {
    /// The failure.
    pub kind:   LexErrorKind,
    /// 1-based line of the offending input.
    pub line:   usize,
    /// 1-based column of the offending input.
    pub column: usize,
}
