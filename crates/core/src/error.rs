//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures decided by the domain itself: bad input, bad ids, and records
/// that are gone by the time a write reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that breaks a field rule (blank body, title too long, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An id that is not a positive integer.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The record does not exist (or no longer exists).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
