//! `blogapi-content` — posts and comments.
//!
//! Records here carry no authorization logic; ownership and visibility are
//! exposed through the `Authored`/`Publishable` traits from `blogapi-core`
//! and decided by `blogapi-auth`.

pub mod comment;
pub mod post;

pub use comment::{Comment, CommentChanges, NewComment};
pub use post::{NewPost, Post, PostChanges, TITLE_MAX_LEN};

use blogapi_core::{DomainError, DomainResult};

/// Trim a required text field and reject it when blank.
pub(crate) fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
