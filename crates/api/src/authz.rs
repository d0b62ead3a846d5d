//! Resource-scoped authorization guards for handlers.
//!
//! Each guard runs the checks in a fixed order: action shape (is an identity
//! needed at all), then the lookup, then the resource-level policy. Missing
//! resources and resources the actor may not read produce the same error.

use blogapi_auth::{Action, AuthzError, authorize_action, authorize_comment, authorize_post};
use blogapi_content::{Comment, Post};
use blogapi_core::{CommentId, PostId};
use blogapi_infra::{CommentRepository, PostRepository};

use crate::context::ActorContext;

/// Load a post the actor is allowed to perform `action` on.
pub fn load_post<R>(repo: &R, actor: &ActorContext, id: PostId, action: Action) -> Result<Post, AuthzError>
where
    R: PostRepository + ?Sized,
{
    let identity = actor.identity();
    authorize_action(identity, action)?;

    let post = repo.get_post(id).ok_or(AuthzError::NotFoundOrForbidden)?;
    authorize_post(identity, action, &post)?;
    Ok(post)
}

/// Load a comment the actor is allowed to perform `action` on.
pub fn load_comment<R>(
    repo: &R,
    actor: &ActorContext,
    id: CommentId,
    action: Action,
) -> Result<Comment, AuthzError>
where
    R: CommentRepository + ?Sized,
{
    let identity = actor.identity();
    authorize_action(identity, action)?;

    let comment = repo.get_comment(id).ok_or(AuthzError::NotFoundOrForbidden)?;
    authorize_comment(identity, action, &comment)?;
    Ok(comment)
}
