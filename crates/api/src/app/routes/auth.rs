use std::sync::Arc;

use axum::{Extension, Json, Router, extract::rejection::JsonRejection, routing::post};

use blogapi_auth::Identity;

use crate::app::dto::{AccessTokenResponse, RefreshRequest, TokenRequest, TokenResponse};
use crate::app::errors::{ApiResult, body};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/token/refresh", post(refresh_token))
}

/// Exchange a username/password for an access/refresh pair.
pub async fn obtain_token(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let req = body(payload)?;

    let user = services.credentials.verify(&req.username, &req.password)?;
    let pair = services.tokens.issue(&Identity::from(&user))?;

    tracing::info!(user_id = %user.id, "tokens issued");
    Ok(Json(TokenResponse::new(pair, &user)))
}

pub async fn refresh_token(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let req = body(payload)?;
    let access_token = services.tokens.refresh(&req.refresh_token)?;
    Ok(Json(AccessTokenResponse { access_token }))
}
