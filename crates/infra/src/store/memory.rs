//! In-memory store for tests/dev.
//!
//! All three tables live behind one lock so cascades (user → posts →
//! comments) and uniqueness checks are atomic.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use blogapi_auth::{CredentialError, HashedPassword, User, UserChanges, UserDirectory};
use blogapi_content::{Comment, CommentChanges, NewComment, NewPost, Post, PostChanges};
use blogapi_core::{CommentId, DomainError, DomainResult, PostId, UserId};

use super::{CommentRepository, PostRepository, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn remove_post_cascade(&mut self, id: PostId) -> bool {
        if self.posts.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != id);
        true
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBlogStore {
    inner: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another request panicked mid-call; every
    // mutation below leaves the tables consistent before it can panic.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl UserDirectory for InMemoryBlogStore {
    fn find_by_id(&self, id: UserId) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    fn insert(
        &self,
        username: String,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Result<User, CredentialError> {
        let mut tables = self.write();
        if tables.username_taken(&username, None) {
            return Err(CredentialError::DuplicateUsername);
        }

        tables.last_user_id += 1;
        let user = User {
            id: UserId::new(tables.last_user_id),
            username,
            password_hash,
            date_joined: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, CredentialError> {
        let mut tables = self.write();
        if let Some(name) = &changes.username {
            if tables.username_taken(name, Some(id)) {
                return Err(CredentialError::DuplicateUsername);
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.username {
            user.username = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    fn remove(&self, id: UserId) -> bool {
        let mut tables = self.write();
        if tables.users.remove(&id).is_none() {
            return false;
        }

        let owned: Vec<PostId> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in &owned {
            tables.remove_post_cascade(*post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);

        debug!(user_id = %id, posts_removed = owned.len(), "user removed");
        true
    }

    fn list(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }
}

impl PostRepository for InMemoryBlogStore {
    fn insert_post(&self, author_id: UserId, input: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError> {
        let mut tables = self.write();
        if !tables.users.contains_key(&author_id) {
            return Err(StoreError::UnknownAuthor);
        }

        tables.last_post_id += 1;
        let post = Post::new(PostId::new(tables.last_post_id), author_id, input, now);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn get_post(&self, id: PostId) -> Option<Post> {
        self.read().posts.get(&id).cloned()
    }

    fn list_posts(&self) -> Vec<Post> {
        self.read().posts.values().cloned().collect()
    }

    fn update_post(&self, id: PostId, changes: &PostChanges, now: DateTime<Utc>) -> DomainResult<Post> {
        let mut tables = self.write();
        let post = tables.posts.get_mut(&id).ok_or(DomainError::NotFound)?;
        post.apply_changes(changes, now)?;
        Ok(post.clone())
    }

    fn remove_post(&self, id: PostId) -> bool {
        self.write().remove_post_cascade(id)
    }
}

impl CommentRepository for InMemoryBlogStore {
    fn insert_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        input: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.write();
        if !tables.posts.contains_key(&post_id) {
            return Err(StoreError::MissingPost);
        }
        if !tables.users.contains_key(&author_id) {
            return Err(StoreError::UnknownAuthor);
        }

        tables.last_comment_id += 1;
        let comment = Comment::new(
            CommentId::new(tables.last_comment_id),
            post_id,
            author_id,
            input,
            now,
        );
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    fn get_comment(&self, id: CommentId) -> Option<Comment> {
        self.read().comments.get(&id).cloned()
    }

    fn comments_for_post(&self, post_id: PostId) -> Vec<Comment> {
        self.read()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    fn count_comments(&self, post_id: PostId) -> usize {
        self.read()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count()
    }

    fn update_comment(
        &self,
        id: CommentId,
        changes: &CommentChanges,
        now: DateTime<Utc>,
    ) -> DomainResult<Comment> {
        let mut tables = self.write();
        let comment = tables.comments.get_mut(&id).ok_or(DomainError::NotFound)?;
        comment.apply_changes(changes, now)?;
        Ok(comment.clone())
    }

    fn remove_comment(&self, id: CommentId) -> bool {
        self.write().comments.remove(&id).is_some()
    }
}
