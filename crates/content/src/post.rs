//! Post record and its creation/patch inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blogapi_core::{Authored, DomainError, DomainResult, PostId, Publishable, UserId};

use crate::required_text;

/// Maximum number of characters in a post title.
pub const TITLE_MAX_LEN: usize = 200;

/// A blog post.
///
/// # Invariants
/// - `author_id` is fixed at creation and never changes.
/// - `title` is non-blank and at most [`TITLE_MAX_LEN`] characters.
/// - `body` is non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post. The author is never part of it; it comes from
/// the authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub is_published: bool,
}

/// Partial update of a post. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_published: Option<bool>,
}

fn validate_title(title: &str) -> DomainResult<String> {
    let title = required_text("title", title)?;
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(format!(
            "title cannot exceed {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(title)
}

impl NewPost {
    /// Normalize and validate the input.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            title: validate_title(&self.title)?,
            body: required_text("body", &self.body)?,
            is_published: self.is_published,
        })
    }
}

impl Post {
    /// Build a post from validated input. Timestamps start equal.
    pub fn new(id: PostId, author_id: UserId, input: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id,
            title: input.title,
            body: input.body,
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch. Either every field is applied or none is.
    pub fn apply_changes(&mut self, changes: &PostChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let title = changes.title.as_deref().map(validate_title).transpose()?;
        let body = changes
            .body
            .as_deref()
            .map(|b| required_text("body", b))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(published) = changes.is_published {
            self.is_published = published;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Authored for Post {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

impl Publishable for Post {
    fn is_published(&self) -> bool {
        self.is_published
    }
}
