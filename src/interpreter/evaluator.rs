/// Core evaluation logic and session state.
///
/// Contains the `Interpreter`, the execution context it keeps between calls,
/// and the result envelope of `execute`.
pub mod core;

/// Declaration bindings.
///
/// A binding either owns its structure or is pinned to an instance in the
/// shared registry; pinned bindings are re-resolved on every access.
pub mod binding;

/// Operand evaluation.
///
/// Turns parsed operations into commands with concrete values: random calls
/// are drawn, identifiers resolved against variables.
pub mod command;

/// Dispatch table.
///
/// Routes each command to the capability that implements it, falling back to
/// generic sequence or tree capabilities where the specific one is missing.
pub mod dispatch;
