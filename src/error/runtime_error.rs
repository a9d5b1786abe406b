use thiserror::Error;

use crate::error::StructureError;

/// Represents all errors that can occur while executing a program.
///
/// `UnknownStructureType`, `StructureNotFound` and `StructureBusy` stop a
/// declaration; the others are recorded on the operation and execution
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The factory cannot build the declared kind.
    #[error("[Interpreter Error] Unknown structure type: {0}")]
    UnknownStructureType(String),
    /// A name has no live instance behind it.
    #[error("[Interpreter Error] Structure {0} not found")]
    StructureNotFound(String),
    /// A shared instance is already borrowed by another interpreter.
    #[error("[Interpreter Error] Structure {0} is in use")]
    StructureBusy(String),
    /// A name is bound to an instance of another kind.
    #[error("[Interpreter Error] Structure {name} already exists with different type: {existing} vs {declared}")]
    StructureTypeMismatch {
        /// Binding name.
        name:     String,
        /// Kind of the live instance.
        existing: &'static str,
        /// Kind written in the declaration.
        declared: &'static str,
    },
    /// The bound backend lacks the capability.
    #[error("[Interpreter Error] {operation} is not supported by {structure}")]
    UnsupportedOperation {
        /// Operation keyword.
        operation: &'static str,
        /// Backend name.
        structure: &'static str,
    },
    /// `random(min, max)` with `min > max`.
    #[error("[Interpreter Error] Invalid random range: {min} > {max} (line {line})")]
    InvalidRandomRange {
        /// Lower bound.
        min:  i64,
        /// Upper bound.
        max:  i64,
        /// Source line of the call.
        line: usize,
    },
    /// An operand that the operation cannot use.
    #[error("[Interpreter Error] Invalid operand for {operation}: {details}")]
    InvalidOperand {
        /// Operation keyword.
        operation: &'static str,
        /// Why the operand was rejected.
        details:   String,
    },
    /// The backend rejected the operation.
    #[error("[Interpreter Error] {0}")]
    Structure(#[from] StructureError),
}

impl RuntimeError {
    /// Whether the error ends the current declaration.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self,
                 Self::UnknownStructureType(_) | Self::StructureNotFound(_) | Self::StructureBusy(_))
    }
}
