use axum::{Router, routing::get};

pub mod auth;
pub mod comments;
pub mod posts;
pub mod system;
pub mod users;

/// Router for every endpoint behind the authentication middleware.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
}
