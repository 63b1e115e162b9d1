//! Model validation errors.

use thiserror::Error;

/// Errors raised when constructing model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An identity was empty or only whitespace.
    #[error("identity cannot be empty")]
    EmptyIdentity,

    /// A group identifier was empty or only whitespace.
    #[error("group identifier cannot be empty")]
    EmptyGroupId,
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
