//! Persistence collaborator: repository traits and the in-memory store.
//!
//! Repositories are synchronous; every call is a single atomic lookup or
//! mutation. They know nothing about actors or policy.

pub mod memory;

pub use memory::InMemoryBlogStore;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use blogapi_content::{Comment, CommentChanges, NewComment, NewPost, Post, PostChanges};
use blogapi_core::{CommentId, DomainResult, PostId, UserId};

/// Why an insert was refused.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The author was deleted before the write landed.
    #[error("author no longer exists")]
    UnknownAuthor,

    /// The parent post does not exist.
    #[error("post not found")]
    MissingPost,
}

pub trait PostRepository: Send + Sync {
    /// Fails with `UnknownAuthor` if the author is gone.
    fn insert_post(&self, author_id: UserId, input: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError>;
    fn get_post(&self, id: PostId) -> Option<Post>;
    /// All posts, ordered by id.
    fn list_posts(&self) -> Vec<Post>;
    /// Apply a patch under the write lock. `NotFound` if the post is gone.
    fn update_post(&self, id: PostId, changes: &PostChanges, now: DateTime<Utc>) -> DomainResult<Post>;
    /// Delete a post and its comments. Returns whether it existed.
    fn remove_post(&self, id: PostId) -> bool;
}

pub trait CommentRepository: Send + Sync {
    /// Fails if the parent post or the author does not exist.
    fn insert_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        input: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError>;
    fn get_comment(&self, id: CommentId) -> Option<Comment>;
    /// Comments of a post, ordered by id.
    fn comments_for_post(&self, post_id: PostId) -> Vec<Comment>;
    fn count_comments(&self, post_id: PostId) -> usize;
    fn update_comment(
        &self,
        id: CommentId,
        changes: &CommentChanges,
        now: DateTime<Utc>,
    ) -> DomainResult<Comment>;
    fn remove_comment(&self, id: CommentId) -> bool;
}

impl<S> PostRepository for Arc<S>
where
    S: PostRepository + ?Sized,
{
    fn insert_post(&self, author_id: UserId, input: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError> {
        (**self).insert_post(author_id, input, now)
    }

    fn get_post(&self, id: PostId) -> Option<Post> {
        (**self).get_post(id)
    }

    fn list_posts(&self) -> Vec<Post> {
        (**self).list_posts()
    }

    fn update_post(&self, id: PostId, changes: &PostChanges, now: DateTime<Utc>) -> DomainResult<Post> {
        (**self).update_post(id, changes, now)
    }

    fn remove_post(&self, id: PostId) -> bool {
        (**self).remove_post(id)
    }
}

impl<S> CommentRepository for Arc<S>
where
    S: CommentRepository + ?Sized,
{
    fn insert_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        input: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        (**self).insert_comment(post_id, author_id, input, now)
    }

    fn get_comment(&self, id: CommentId) -> Option<Comment> {
        (**self).get_comment(id)
    }

    fn comments_for_post(&self, post_id: PostId) -> Vec<Comment> {
        (**self).comments_for_post(post_id)
    }

    fn count_comments(&self, post_id: PostId) -> usize {
        (**self).count_comments(post_id)
    }

    fn update_comment(
        &self,
        id: CommentId,
        changes: &CommentChanges,
        now: DateTime<Utc>,
    ) -> DomainResult<Comment> {
        (**self).update_comment(id, changes, now)
    }

    fn remove_comment(&self, id: CommentId) -> bool {
        (**self).remove_comment(id)
    }
}
