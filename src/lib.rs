//! # dsviz
//!
//! dsviz is a small scripting language for describing data-structure
//! animations. A program declares named structures (lists, stacks, queues,
//! trees, Huffman trees) and the operations to apply to them; the interpreter
//! runs those operations against real backends and returns a JSON-ready
//! envelope with the final state of every structure, a narration log, and one
//! record per operation from which a front end can replay the animation.
//!
//! ```
//! use dsviz::{execute_source, interpreter::evaluator::core::Interpreter};
//!
//! let mut interpreter = Interpreter::new();
//! let result = execute_source(&mut interpreter,
//!                             "BST t { insert 50 insert 30 insert 70 traverse inorder }").unwrap();
//!
//! assert!(result.success);
//! let traversal = &result.operation_history[3];
//! assert_eq!(traversal.result(), &serde_json::json!([30, 50, 70]));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Program,
    error::SyntaxError,
    interpreter::{
        evaluator::core::{ExecutionResult, Interpreter},
        lexer::tokenize,
        parser::core::parse,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `StructureDeclaration` and
/// `OperationKind` types that represent a parsed program. The AST is built by
/// the parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines one enum variant per operation form, so dispatch is checked for
///   exhaustiveness at compile time.
/// - Attaches source locations to declarations and operations.
/// - Renders operations back in source form for narration.
pub mod ast;
/// Provides unified error types for lexing, parsing and execution.
///
/// This module defines all errors that can be raised while tokenizing,
/// parsing, or running a program, and the errors structure backends report.
///
/// # Responsibilities
/// - Defines error enums for every stage (lexer, parser, interpreter,
///   backends).
/// - Attaches line and column numbers where a source location exists.
/// - Keeps message shapes stable so callers can match on them.
pub mod error;
/// Orchestrates the entire process of program execution.
///
/// This module ties together lexing, parsing, operand evaluation and dispatch
/// to provide a complete runtime for DSL programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and values.
/// - Provides entry points for parsing and executing programs.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Caller-managed sessions.
///
/// Maps session ids to interpreters that share one structure registry, so
/// bindings persist across calls and published structures are visible to
/// every session.
pub mod session;
/// Structure backends and their capability contract.
///
/// # Responsibilities
/// - Defines the capability traits the interpreter dispatches against.
/// - Provides one backend per structure family, each recording its own
///   animation steps.
/// - Provides the factory and the shared registry.
pub mod structures;
/// General utilities for safe numeric conversion and random numbers.
///
/// # Responsibilities
/// - Safely convert between `i64`, `u64`, `usize`, and `f64` without silent
///   data loss.
/// - Provide the seeded random stream behind `random(min, max)`.
pub mod util;

/// Tokenizes and parses a program.
///
/// # Errors
/// Returns `SyntaxError::Lexical` for malformed input such as an unterminated
/// string, and `SyntaxError::Parse` for a grammar mismatch. No partial program
/// is returned.
///
/// # Examples
/// ```
/// use dsviz::parse_program;
///
/// let program = parse_program("Stack s { push 1 push 2 pop }").unwrap();
/// assert_eq!(program.structures.len(), 1);
/// assert_eq!(program.operation_count(), 3);
///
/// let err = parse_program("Huffman h { build_text \"ABRA }").unwrap_err();
/// assert!(err.to_string().starts_with("[Lexer Error]"));
/// ```
pub fn parse_program(source: &str) -> Result<Program, SyntaxError> {
    let tokens = tokenize(source)?;
    Ok(parse(&tokens)?)
}

/// Parses `source` and executes it with `interpreter`.
///
/// # Errors
/// Returns a `SyntaxError` if the source does not parse; nothing is executed
/// in that case. Runtime failures are reported inside the result.
pub fn execute_source(interpreter: &mut Interpreter, source: &str) -> Result<ExecutionResult, SyntaxError> {
    let program = parse_program(source)?;
    Ok(interpreter.execute(&program))
}
