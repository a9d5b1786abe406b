/// Program and declaration parsing.
///
/// Contains the parser entry point, the `ParseResult` alias and the rule for
/// `Kind [name] { operations }` blocks.
pub mod core;

/// Operation parsing.
///
/// One rule per operation keyword, each consuming the operands its form
/// allows.
pub mod operation;

/// Value parsing.
///
/// Literals, identifiers, `null`, `random(...)` calls and array literals.
pub mod value;

/// Shared parser helpers.
///
/// Token expectations, newline skipping and the construction of uniform
/// `Expected X, got Y` errors.
pub mod utils;
