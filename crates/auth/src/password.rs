//! Password hashing and verification using Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::CredentialError;

/// PHC-formatted Argon2id hash of a password.
///
/// `Debug` output is redacted so the hash never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

/// Hash a password with a fresh random 16-byte salt.
pub fn hash_password(raw: &str) -> Result<HashedPassword, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?
        .to_string();

    Ok(HashedPassword(hash))
}

/// Verify a password against its stored hash (constant-time comparison).
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash itself
/// cannot be parsed or verified.
pub fn verify_password(raw: &str, hash: &HashedPassword) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash.as_str())
        .map_err(|e| CredentialError::Hashing(format!("invalid stored hash: {e}")))?;

    match Argon2::default().verify_password(raw.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hashing(e.to_string())),
    }
}
