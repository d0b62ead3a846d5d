//! User records and the directory abstraction the auth layer reads them through.

use chrono::{DateTime, Utc};

use blogapi_core::UserId;

use crate::{CredentialError, HashedPassword};

/// Maximum number of characters in a username.
pub const USERNAME_MAX_LEN: usize = 150;

/// Stored user record.
///
/// # Invariants
/// - `id` is immutable.
/// - `username` is unique across the directory (exact match).
/// - `password_hash` is a one-way salted hash; the raw password is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: HashedPassword,
    pub date_joined: DateTime<Utc>,
}

/// Changes to an existing user, as stored (password already hashed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<HashedPassword>,
}

/// User persistence collaborator.
///
/// Implementations must enforce username uniqueness atomically in `insert`
/// and `update`, returning [`CredentialError::DuplicateUsername`].
pub trait UserDirectory: Send + Sync {
    fn find_by_id(&self, id: UserId) -> Option<User>;

    /// Exact-match lookup.
    fn find_by_username(&self, username: &str) -> Option<User>;

    fn insert(
        &self,
        username: String,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Result<User, CredentialError>;

    /// Returns `Ok(None)` when the user does not exist.
    fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, CredentialError>;

    /// Remove a user. Returns whether the user existed.
    fn remove(&self, id: UserId) -> bool;

    /// All users, ordered by id.
    fn list(&self) -> Vec<User>;
}

impl<D> UserDirectory for std::sync::Arc<D>
where
    D: UserDirectory + ?Sized,
{
    fn find_by_id(&self, id: UserId) -> Option<User> {
        (**self).find_by_id(id)
    }

    fn find_by_username(&self, username: &str) -> Option<User> {
        (**self).find_by_username(username)
    }

    fn insert(
        &self,
        username: String,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Result<User, CredentialError> {
        (**self).insert(username, password_hash, now)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, CredentialError> {
        (**self).update(id, changes)
    }

    fn remove(&self, id: UserId) -> bool {
        (**self).remove(id)
    }

    fn list(&self) -> Vec<User> {
        (**self).list()
    }
}
