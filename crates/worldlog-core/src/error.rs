//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The persisted world collection could not be parsed.
    #[error("malformed persisted payload: {0}")]
    MalformedPayload(String),

    /// Input rejected at a storage or domain boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
