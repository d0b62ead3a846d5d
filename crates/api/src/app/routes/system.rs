use axum::{Extension, Json, http::StatusCode};
use serde_json::{Value, json};

use blogapi_auth::require_actor;

use crate::app::errors::ApiResult;
use crate::context::ActorContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(actor): Extension<ActorContext>) -> ApiResult<Json<Value>> {
    let identity = require_actor(actor.identity())?;
    Ok(Json(json!({
        "user_id": identity.user_id,
        "username": identity.username,
    })))
}
