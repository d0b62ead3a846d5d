//! Service wiring: one store shared by the credential store, the token
//! service and the route handlers.

use std::sync::Arc;

use blogapi_auth::{CredentialError, CredentialStore, TokenService, TokenSettings, UserDirectory};
use blogapi_content::{Comment, Post};
use blogapi_core::{DomainError, UserId};
use blogapi_infra::{CommentRepository, InMemoryBlogStore};

use crate::app::dto::{CommentView, PostView, UserView};
use crate::app::errors::ApiResult;

pub type Store = Arc<InMemoryBlogStore>;

pub struct AppServices {
    pub store: Store,
    pub credentials: CredentialStore<Store>,
    pub tokens: Arc<TokenService<Store>>,
}

pub fn build_services(settings: TokenSettings) -> Result<AppServices, CredentialError> {
    let store: Store = Arc::new(InMemoryBlogStore::new());
    let credentials = CredentialStore::new(store.clone())?;
    let tokens = Arc::new(TokenService::new(settings, store.clone()));

    Ok(AppServices {
        store,
        credentials,
        tokens,
    })
}

impl AppServices {
    /// Public view of a resource's author, if the author still resolves.
    fn author_view(&self, id: UserId) -> Option<UserView> {
        self.store.find_by_id(id).as_ref().map(UserView::from)
    }

    fn try_post_view(&self, post: Post) -> Option<PostView> {
        let Some(author) = self.author_view(post.author_id) else {
            tracing::warn!(post_id = %post.id, author_id = %post.author_id, "post author does not resolve");
            return None;
        };
        let count = self.store.count_comments(post.id);
        Some(PostView::new(post, author, count))
    }

    fn try_comment_view(&self, comment: Comment) -> Option<CommentView> {
        let Some(author) = self.author_view(comment.author_id) else {
            tracing::warn!(comment_id = %comment.id, author_id = %comment.author_id, "comment author does not resolve");
            return None;
        };
        Some(CommentView::new(comment, author))
    }

    /// A single post whose author is gone reads as not found.
    pub fn post_view(&self, post: Post) -> ApiResult<PostView> {
        self.try_post_view(post)
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub fn comment_view(&self, comment: Comment) -> ApiResult<CommentView> {
        self.try_comment_view(comment)
            .ok_or_else(|| DomainError::not_found().into())
    }

    /// Listing views. Rows whose author no longer resolves are left out
    /// rather than failing the whole list.
    pub fn post_views(&self, posts: Vec<Post>) -> Vec<PostView> {
        posts.into_iter().filter_map(|p| self.try_post_view(p)).collect()
    }

    pub fn comment_views(&self, comments: Vec<Comment>) -> Vec<CommentView> {
        comments
            .into_iter()
            .filter_map(|c| self.try_comment_view(c))
            .collect()
    }
}
