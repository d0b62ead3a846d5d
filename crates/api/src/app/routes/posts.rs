use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;

use blogapi_auth::{Action, require_actor, visible_posts};
use blogapi_content::{NewComment, NewPost, PostChanges};
use blogapi_core::{DomainError, PostId};
use blogapi_infra::{CommentRepository, PostRepository};

use crate::app::dto::{
    CommentView, CreateCommentRequest, CreatePostRequest, ListResponse, PostDetailView, PostView,
    UpdatePostRequest,
};
use crate::app::errors::{ApiResult, body};
use crate::app::services::AppServices;
use crate::authz::load_post;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
        .route("/:id/comments", get(list_comments).post(create_comment))
}

pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> ApiResult<Json<ListResponse<PostView>>> {
    let posts = visible_posts(actor.identity(), services.store.list_posts());
    Ok(Json(ListResponse::new(services.post_views(posts))))
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let identity = require_actor(actor.identity())?;
    let input = NewPost::from(body(payload)?).validated()?;

    let post = services.store.insert_post(identity.user_id, input, Utc::now())?;
    tracing::info!(post_id = %post.id, user_id = %identity.user_id, "post created");

    Ok((StatusCode::CREATED, Json(services.post_view(post)?)))
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostDetailView>> {
    let id: PostId = id.parse()?;
    let post = load_post(&services.store, &actor, id, Action::Read)?;

    let comments = services.comment_views(services.store.comments_for_post(post.id));

    Ok(Json(PostDetailView {
        post: services.post_view(post)?,
        comments,
    }))
}

pub async fn update_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResult<Json<PostView>> {
    let id: PostId = id.parse()?;
    let post = load_post(&services.store, &actor, id, Action::Update)?;
    let changes = PostChanges::from(body(payload)?);

    let post = services.store.update_post(post.id, &changes, Utc::now())?;

    tracing::info!(post_id = %post.id, "post updated");
    Ok(Json(services.post_view(post)?))
}

pub async fn delete_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: PostId = id.parse()?;
    let post = load_post(&services.store, &actor, id, Action::Delete)?;

    if !services.store.remove_post(post.id) {
        return Err(DomainError::not_found().into());
    }

    tracing::info!(post_id = %post.id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Comments of a post. The post itself must be readable by the actor.
pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<ListResponse<CommentView>>> {
    let id: PostId = id.parse()?;
    let post = load_post(&services.store, &actor, id, Action::Read)?;

    let items = services.comment_views(services.store.comments_for_post(post.id));
    Ok(Json(ListResponse::new(items)))
}

pub async fn create_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let identity = require_actor(actor.identity())?;
    let id: PostId = id.parse()?;
    let post = load_post(&services.store, &actor, id, Action::Read)?;
    let input = NewComment::from(body(payload)?).validated()?;

    let comment = services
        .store
        .insert_comment(post.id, identity.user_id, input, Utc::now())?;
    tracing::info!(comment_id = %comment.id, post_id = %post.id, user_id = %identity.user_id, "comment created");

    Ok((StatusCode::CREATED, Json(services.comment_view(comment)?)))
}
