//! Authorization policy: pure decisions over (actor, action, resource).
//!
//! - No IO
//! - No panics
//! - Total over their inputs
//!
//! The `can_*` predicates are the primitive rules. The `authorize_*`
//! functions compose them in the order every endpoint applies them and map a
//! denial to the error the caller should see.

use thiserror::Error;

use blogapi_core::{Authored, Publishable};

use crate::Identity;

/// Shape of an operation, independent of the resource it targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Safe actions never modify state.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::Read)
    }
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No identity on an action that requires one.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The resource is missing or not visible to this actor.
    #[error("not found")]
    NotFoundOrForbidden,

    /// Authenticated, but not the resource's author.
    #[error("only the author may modify this resource")]
    OwnershipViolation,
}

/// Published posts are readable by everyone, drafts by any authenticated actor.
pub fn can_read_post<P: Publishable>(actor: Option<&Identity>, post: &P) -> bool {
    post.is_published() || actor.is_some()
}

/// Comments carry no visibility gate of their own.
pub fn can_read_comment<C: Authored>(_actor: Option<&Identity>, _comment: &C) -> bool {
    true
}

/// Only the author may modify or delete a resource.
pub fn can_write<R: Authored>(actor: Option<&Identity>, resource: &R) -> bool {
    actor.is_some_and(|a| a.user_id == resource.author_id())
}

pub fn can_create_post(actor: Option<&Identity>) -> bool {
    actor.is_some()
}

pub fn can_create_comment(actor: Option<&Identity>) -> bool {
    actor.is_some()
}

/// Registration is the one operation open to anonymous callers.
pub fn can_register_user(_actor: Option<&Identity>) -> bool {
    true
}

/// Filter a post listing down to what the actor may see.
///
/// Anonymous actors get published posts only; any authenticated actor gets
/// everything.
pub fn visible_posts<P: Publishable>(actor: Option<&Identity>, posts: Vec<P>) -> Vec<P> {
    if actor.is_some() {
        return posts;
    }
    posts.into_iter().filter(|p| p.is_published()).collect()
}

/// Resource-independent check, run before the resource is loaded.
///
/// Safe actions always pass; unsafe actions need an identity.
pub fn authorize_action(actor: Option<&Identity>, action: Action) -> Result<(), AuthzError> {
    if action.is_safe() || actor.is_some() {
        Ok(())
    } else {
        Err(AuthzError::AuthenticationRequired)
    }
}

/// Return the identity or fail with `AuthenticationRequired`.
pub fn require_actor(actor: Option<&Identity>) -> Result<&Identity, AuthzError> {
    actor.ok_or(AuthzError::AuthenticationRequired)
}

/// Full check for an action on an already-persisted post.
pub fn authorize_post<P>(actor: Option<&Identity>, action: Action, post: &P) -> Result<(), AuthzError>
where
    P: Publishable + Authored,
{
    authorize_action(actor, action)?;
    match action {
        Action::Read if can_read_post(actor, post) => Ok(()),
        Action::Read => Err(AuthzError::NotFoundOrForbidden),
        Action::Create if can_create_post(actor) => Ok(()),
        Action::Create => Err(AuthzError::AuthenticationRequired),
        Action::Update | Action::Delete => ownership(actor, post),
    }
}

/// Full check for an action on an already-persisted comment.
pub fn authorize_comment<C>(actor: Option<&Identity>, action: Action, comment: &C) -> Result<(), AuthzError>
where
    C: Authored,
{
    authorize_action(actor, action)?;
    match action {
        Action::Read if can_read_comment(actor, comment) => Ok(()),
        Action::Read => Err(AuthzError::NotFoundOrForbidden),
        Action::Create if can_create_comment(actor) => Ok(()),
        Action::Create => Err(AuthzError::AuthenticationRequired),
        Action::Update | Action::Delete => ownership(actor, comment),
    }
}

fn ownership<R: Authored>(actor: Option<&Identity>, resource: &R) -> Result<(), AuthzError> {
    match actor {
        None => Err(AuthzError::AuthenticationRequired),
        Some(_) if can_write(actor, resource) => Ok(()),
        Some(_) => Err(AuthzError::OwnershipViolation),
    }
}
