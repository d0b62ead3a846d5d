use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;

use blogapi_auth::Action;
use blogapi_content::CommentChanges;
use blogapi_core::{CommentId, DomainError};
use blogapi_infra::CommentRepository;

use crate::app::dto::{CommentView, UpdateCommentRequest};
use crate::app::errors::{ApiResult, body};
use crate::app::services::AppServices;
use crate::authz::load_comment;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new().route(
        "/:id",
        get(get_comment).patch(update_comment).delete(delete_comment),
    )
}

pub async fn get_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommentView>> {
    let id: CommentId = id.parse()?;
    let comment = load_comment(&services.store, &actor, id, Action::Read)?;
    Ok(Json(services.comment_view(comment)?))
}

pub async fn update_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> ApiResult<Json<CommentView>> {
    let id: CommentId = id.parse()?;
    let comment = load_comment(&services.store, &actor, id, Action::Update)?;
    let changes = CommentChanges::from(body(payload)?);

    let comment = services.store.update_comment(comment.id, &changes, Utc::now())?;

    Ok(Json(services.comment_view(comment)?))
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: CommentId = id.parse()?;
    let comment = load_comment(&services.store, &actor, id, Action::Delete)?;

    if !services.store.remove_comment(comment.id) {
        return Err(DomainError::not_found().into());
    }

    tracing::info!(comment_id = %comment.id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
