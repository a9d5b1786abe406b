/// The evaluator module binds declarations and runs their operations.
///
/// The evaluator walks the AST one declaration at a time, resolves each
/// declaration name to a structure instance (reused from the session, taken
/// from the shared registry, or freshly created), evaluates operands and
/// dispatches every operation to the instance's capabilities.
///
/// # Responsibilities
/// - Keeps session state: bindings, variables, animation settings.
/// - Evaluates random calls and identifiers into concrete values.
/// - Records one op record and narration per operation.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens:
/// structure kinds, operation keywords, traversal orders, literals,
/// identifiers and punctuation. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric and string literals, identifiers, and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// a `Program` of structure declarations and their operations.
///
/// # Responsibilities
/// - Converts tokens into declarations, operations and value expressions.
/// - Validates grammar, reporting the first mismatch with its location.
pub mod parser;
/// The value module defines the runtime values stored in structures.
pub mod value;
