//! Infrastructure layer: persistence adapters behind repository traits.

pub mod store;

pub use store::{CommentRepository, InMemoryBlogStore, PostRepository, StoreError};
