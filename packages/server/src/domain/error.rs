//! Domain error types.

use thiserror::Error;

/// Validation error for wire-supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier must be between 1 and 64 characters (got {0})")]
    InvalidLength(usize),
}

/// Error reading from the code-block definition store.
///
/// Store failures never fail a room operation: hydration degrades to an
/// empty code/solution instead (see `SessionRegistry`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to load code block definitions: {0}")]
    Load(String),
}

/// Error pushing a message to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
