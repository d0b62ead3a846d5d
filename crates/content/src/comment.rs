//! Comment record and its creation/patch inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blogapi_core::{Authored, CommentId, DomainResult, PostId, UserId};

use crate::required_text;

/// A comment on a post.
///
/// `post_id` and `author_id` are fixed at creation. `is_approved` is stored
/// but no policy consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub body: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewComment {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentChanges {
    pub body: Option<String>,
}

impl NewComment {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            body: required_text("body", &self.body)?,
        })
    }
}

impl Comment {
    pub fn new(
        id: CommentId,
        post_id: PostId,
        author_id: UserId,
        input: NewComment,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            author_id,
            body: input.body,
            is_approved: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(&mut self, changes: &CommentChanges, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(body) = changes.body.as_deref() {
            self.body = required_text("body", body)?;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}
