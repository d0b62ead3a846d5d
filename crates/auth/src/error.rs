use thiserror::Error;

use blogapi_core::DomainError;

/// Failures of the credential store.
///
/// `InvalidCredentials` deliberately covers both "unknown user" and
/// "wrong password".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("no active account found with the given credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Failures of token issuance and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has the wrong type for this operation")]
    WrongTokenType,

    #[error("token refers to an unknown user")]
    UnknownUser,

    #[error("token signing failed: {0}")]
    Signing(String),
}
