//! `blogapi-auth` — authentication and authorization decision layer.
//!
//! This crate is intentionally decoupled from HTTP and storage: users are
//! reached only through the [`UserDirectory`] trait.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod password;
pub mod policy;
pub mod token;
pub mod user;

pub use claims::{TokenClaims, TokenType, validate_claims};
pub use credentials::CredentialStore;
pub use error::{CredentialError, TokenError};
pub use identity::Identity;
pub use password::HashedPassword;
pub use policy::{
    Action, AuthzError, authorize_action, authorize_comment, authorize_post, can_register_user,
    require_actor, visible_posts,
};
pub use token::{BearerAuthenticator, TokenPair, TokenService, TokenSettings};
pub use user::{User, UserChanges, UserDirectory};

#[cfg(test)]
pub(crate) mod test_support;
