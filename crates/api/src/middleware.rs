use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use blogapi_auth::{BearerAuthenticator, TokenError};

use crate::app::errors::ApiError;
use crate::context::ActorContext;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn BearerAuthenticator>,
}

/// Attach an [`ActorContext`] to every request.
///
/// No `Authorization` header means an anonymous actor. A header that is
/// present but unusable is rejected here, even on routes that allow
/// anonymous callers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = match extract_bearer(req.headers())? {
        None => ActorContext::anonymous(),
        Some(token) => {
            let identity = state.authenticator.authenticate_bearer(token).map_err(|e| {
                tracing::debug!(error = %e, "bearer token rejected");
                e
            })?;
            ActorContext::authenticated(identity)
        }
    };

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, TokenError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| TokenError::Malformed)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(TokenError::Malformed)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(TokenError::Malformed);
    }

    Ok(Some(token))
}
