//! Credential store: registration and username/password verification.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use blogapi_core::{DomainError, UserId};

use crate::password::{hash_password, verify_password};
use crate::user::USERNAME_MAX_LEN;
use crate::{CredentialError, HashedPassword, User, UserChanges, UserDirectory};

/// Registration and verification on top of a [`UserDirectory`].
///
/// Raw passwords only live for the duration of a call: they are hashed (or
/// compared) and dropped.
pub struct CredentialStore<D> {
    directory: D,
    // Verified against when the username is unknown, so both failure paths do
    // the same amount of hashing work.
    decoy_hash: HashedPassword,
}

impl<D> CredentialStore<D>
where
    D: UserDirectory,
{
    pub fn new(directory: D) -> Result<Self, CredentialError> {
        Ok(Self {
            directory,
            decoy_hash: hash_password("decoy-password")?,
        })
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Create a user. Fails with `DuplicateUsername` if the name is taken.
    pub fn register(&self, username: &str, raw_password: &str) -> Result<User, CredentialError> {
        self.register_at(username, raw_password, Utc::now())
    }

    pub fn register_at(
        &self,
        username: &str,
        raw_password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, CredentialError> {
        let username = normalize_username(username)?;
        validate_password(raw_password)?;

        let hash = hash_password(raw_password)?;
        let user = self.directory.insert(username, hash, now)?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords yield the same
    /// `InvalidCredentials` error.
    pub fn verify(&self, username: &str, raw_password: &str) -> Result<User, CredentialError> {
        let Some(user) = self.directory.find_by_username(username) else {
            let _ = verify_password(raw_password, &self.decoy_hash);
            debug!("credential check failed");
            return Err(CredentialError::InvalidCredentials);
        };

        match verify_password(raw_password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                debug!(user_id = %user.id, "credential check failed");
                Err(CredentialError::InvalidCredentials)
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "stored password hash is unusable");
                Err(CredentialError::InvalidCredentials)
            }
        }
    }

    /// Change username and/or password. Returns `Ok(None)` for unknown users.
    pub fn update(
        &self,
        id: UserId,
        username: Option<&str>,
        raw_password: Option<&str>,
    ) -> Result<Option<User>, CredentialError> {
        let username = username.map(normalize_username).transpose()?;
        let password_hash = match raw_password {
            Some(raw) => {
                validate_password(raw)?;
                Some(hash_password(raw)?)
            }
            None => None,
        };

        let updated = self.directory.update(
            id,
            UserChanges {
                username,
                password_hash,
            },
        )?;
        if let Some(user) = &updated {
            info!(user_id = %user.id, "user updated");
        }
        Ok(updated)
    }
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::validation(format!(
            "username cannot exceed {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

fn validate_password(raw: &str) -> Result<(), DomainError> {
    if raw.is_empty() {
        return Err(DomainError::validation("password cannot be empty"));
    }
    Ok(())
}
