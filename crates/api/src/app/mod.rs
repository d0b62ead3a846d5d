//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, credential store and token service
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and response views
//! - `errors.rs`: `ApiError` and consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use blogapi_auth::TokenSettings;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(settings: TokenSettings) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(settings)?);
    let auth_state = middleware::AuthState {
        authenticator: services.tokens.clone(),
    };

    // Everything except /health sees an ActorContext, anonymous or not.
    let api = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(api))
}
