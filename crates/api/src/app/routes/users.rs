use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};

use blogapi_auth::{AuthzError, UserDirectory, can_register_user, require_actor};
use blogapi_core::{DomainError, UserId};

use crate::app::dto::{ListResponse, RegisterUserRequest, UpdateUserRequest, UserView};
use crate::app::errors::{ApiResult, body};
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_user).get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    if !can_register_user(actor.identity()) {
        return Err(AuthzError::AuthenticationRequired.into());
    }
    let req = body(payload)?;

    let user = services.credentials.register(&req.username, &req.password)?;
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> ApiResult<Json<ListResponse<UserView>>> {
    require_actor(actor.identity())?;

    let items = services.store.list().iter().map(UserView::from).collect();
    Ok(Json(ListResponse::new(items)))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserView>> {
    require_actor(actor.identity())?;
    let id: UserId = id.parse()?;

    let user = services.store.find_by_id(id).ok_or_else(DomainError::not_found)?;
    Ok(Json(UserView::from(&user)))
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
    let identity = require_actor(actor.identity())?;
    let id: UserId = id.parse()?;
    let req = body(payload)?;

    let user = services
        .credentials
        .update(id, req.username.as_deref(), req.password.as_deref())?
        .ok_or_else(DomainError::not_found)?;

    tracing::info!(user_id = %user.id, actor = %identity, "user updated");
    Ok(Json(UserView::from(&user)))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_actor(actor.identity())?;
    let id: UserId = id.parse()?;

    if !services.store.remove(id) {
        return Err(DomainError::not_found().into());
    }

    tracing::info!(user_id = %id, actor = %identity, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
