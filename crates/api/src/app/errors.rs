use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use blogapi_auth::{AuthzError, CredentialError, TokenError};
use blogapi_core::DomainError;
use blogapi_infra::StoreError;

/// Every failure a handler can return, already classified for the client.
///
/// Server-side failures (hashing, signing) are answered with a generic
/// message; their `Display` text only reaches the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

}

impl ApiError {
    /// Status and stable machine-readable kind.
    pub fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Credential(e) => match e {
                CredentialError::DuplicateUsername => (StatusCode::CONFLICT, "duplicate_username"),
                CredentialError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
                CredentialError::Invalid(d) => domain_kind(d),
                CredentialError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::Token(e) => match e {
                TokenError::Malformed => (StatusCode::UNAUTHORIZED, "token_malformed"),
                TokenError::Expired => (StatusCode::UNAUTHORIZED, "token_expired"),
                TokenError::BadSignature => (StatusCode::UNAUTHORIZED, "token_bad_signature"),
                TokenError::WrongTokenType => (StatusCode::UNAUTHORIZED, "token_wrong_type"),
                TokenError::UnknownUser => (StatusCode::UNAUTHORIZED, "unknown_user"),
                TokenError::Signing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::Authz(e) => match e {
                AuthzError::AuthenticationRequired => {
                    (StatusCode::UNAUTHORIZED, "authentication_required")
                }
                AuthzError::NotFoundOrForbidden => (StatusCode::NOT_FOUND, "not_found"),
                AuthzError::OwnershipViolation => (StatusCode::FORBIDDEN, "ownership_violation"),
            },
            ApiError::Domain(d) => domain_kind(d),
            ApiError::Store(e) => match e {
                StoreError::UnknownAuthor => (StatusCode::UNAUTHORIZED, "unknown_user"),
                StoreError::MissingPost => (StatusCode::NOT_FOUND, "not_found"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        }
    }
}

fn domain_kind(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
        DomainError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.kind();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return json_error(status, code, "internal server error");
        }
        json_error(status, code, self.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Unwrap a JSON body, turning a rejection into a 400 with a stable kind.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(value) = payload?;
    Ok(value)
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
