/// Lexical errors.
///
/// Raised while turning source text into tokens: unterminated strings and
/// block comments, malformed numbers, and characters the language does not
/// use. Every error carries the line and column where the bad input starts.
pub mod lex_error;
/// Parsing errors.
///
/// Raised when the token stream does not match the grammar. All grammar
/// mismatches share one message shape so callers can match on it.
pub mod parse_error;
/// Runtime errors.
///
/// Contains the errors raised while binding declarations and dispatching
/// operations, such as unknown structure types or unbound names.
pub mod runtime_error;
/// Structure backend errors.
///
/// Failures reported by the data structures themselves: out of range
/// indices, empty containers, full stacks, duplicate keys.
pub mod structure_error;

pub use lex_error::{LexErrorKind, LexicalError};
pub use parse_error::{ParseError, SyntaxError};
pub use runtime_error::RuntimeError;
pub use structure_error::{StructureError, StructureResult};
