//! Error types for minirel database operations.

use thiserror::Error;

/// Result type alias using [`MinirelError`].
pub type Result<T> = std::result::Result<T, MinirelError>;

/// Error types for minirel database operations.
#[derive(Debug, Error)]
pub enum MinirelError {
    /// Parse error with location information.
    #[error("Parse error at line {line}, column {col}: {message}")]
    ParseError {
        line: usize,
        col: usize,
        message: String,
    },

    /// Binding error (semantic analysis).
    #[error("Bind error: {0}")]
    BindError(String),

    /// Schema-related errors (invalid schema, duplicate catalog entry, etc.).
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Type mismatch errors.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// Constraint violations (primary key, uniqueness, etc.).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// General execution errors.
    #[error("Execution error: {0}")]
    ExecutionError(String),
}
