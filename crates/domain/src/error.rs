//! Unified error type for the domain layer.

use thiserror::Error;

/// Errors raised by domain invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Two characters in one session bind to the same display name
    #[error("Duplicate character name: {0}")]
    DuplicateCharacterName(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}
