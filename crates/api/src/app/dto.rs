use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blogapi_auth::{TokenPair, User};
use blogapi_content::{Comment, CommentChanges, NewComment, NewPost, Post, PostChanges};
use blogapi_core::{CommentId, PostId, UserId};

// -------------------------
// Request DTOs
// -------------------------
//
// Only client-writable fields are listed. Anything else in the body
// (`author`, `id`, `is_approved`, ...) is ignored.

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(alias = "refresh")]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub is_published: bool,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        NewPost {
            title: req.title,
            body: req.body,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_published: Option<bool>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        PostChanges {
            title: req.title,
            body: req.body,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        NewComment { body: req.body }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: Option<String>,
}

impl From<UpdateCommentRequest> for CommentChanges {
    fn from(req: UpdateCommentRequest) -> Self {
        CommentChanges { body: req.body }
    }
}

// -------------------------
// Views
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: UserId,
    pub username: String,
}

impl TokenResponse {
    pub fn new(pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Public view of a user. The password hash has no field here.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub date_joined: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            date_joined: user.date_joined,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub post: PostId,
    pub author: UserView,
    pub body: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: UserView) -> Self {
        Self {
            id: comment.id,
            post: comment.post_id,
            author,
            body: comment.body,
            is_approved: comment.is_approved,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub author: UserView,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments_count: usize,
}

impl PostView {
    pub fn new(post: Post, author: UserView, comments_count: usize) -> Self {
        Self {
            id: post.id,
            author,
            title: post.title,
            body: post.body,
            is_published: post.is_published,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailView {
    #[serde(flatten)]
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogapi_auth::HashedPassword;

    #[test]
    fn user_view_never_exposes_password_hash() {
        let user = User {
            id: UserId::new(1),
            username: "alice".into(),
            password_hash: HashedPassword::from_phc("$argon2id$v=19$secret"),
            date_joined: Utc::now(),
        };

        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        let keys = json.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys.len(), 3);
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn client_supplied_author_is_ignored() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"T","body":"B","author":42}"#).unwrap();
        let post = NewPost::from(req);
        assert!(!post.is_published);
        assert_eq!(post.title, "T");
    }

    #[test]
    fn refresh_accepts_short_field_name() {
        let req: RefreshRequest = serde_json::from_str(r#"{"refresh":"abc"}"#).unwrap();
        assert_eq!(req.refresh_token, "abc");
    }
}
