use thiserror::Error;

/// Errors reported by structure backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// An index outside `0..=size` for inserts or `0..size` otherwise.
    #[error("index {index} is out of range for size {size}")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// Size of the structure at the time.
        size:  usize,
    },
    /// The structure holds no elements.
    #[error("{0} is empty")]
    Empty(&'static str),
    /// A bounded structure is full.
    #[error("capacity of {capacity} exceeded")]
    CapacityExceeded {
        /// The fixed capacity.
        capacity: usize,
    },
    /// An ordered tree already holds the key.
    #[error("value {0} is already present")]
    Duplicate(String),
    /// A value-based operation found nothing.
    #[error("value {0} not found")]
    ValueNotFound(String),
    /// An explicit insert named a parent that does not exist.
    #[error("parent node {0} not found")]
    ParentNotFound(i64),
    /// An explicit insert targeted a child slot that is taken.
    #[error("{side} child of node {parent} is already occupied")]
    ChildOccupied {
        /// Parent node id.
        parent: i64,
        /// `left` or `right`.
        side:   &'static str,
    },
    /// An argument the backend cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The backend does not implement the request.
    #[error("{operation} is not supported by {structure}")]
    Unsupported {
        /// Operation keyword.
        operation: &'static str,
        /// Backend name.
        structure: &'static str,
    },
}

/// Result type used by structure backends.
pub type StructureResult<T> = Result<T, StructureError>;
