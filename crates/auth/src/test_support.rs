//! Minimal in-memory directory for unit tests of this crate.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use blogapi_core::UserId;

use crate::{CredentialError, HashedPassword, User, UserChanges, UserDirectory};

#[derive(Default)]
pub struct MemoryDirectory {
    users: Mutex<Vec<User>>,
}

impl UserDirectory for MemoryDirectory {
    fn find_by_id(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    fn insert(
        &self,
        username: String,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Result<User, CredentialError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(CredentialError::DuplicateUsername);
        }
        let user = User {
            id: UserId::new(users.len() as i64 + 1),
            username,
            password_hash,
            date_joined: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, CredentialError> {
        let mut users = self.users.lock().unwrap();
        if let Some(name) = &changes.username {
            if users.iter().any(|u| &u.username == name && u.id != id) {
                return Err(CredentialError::DuplicateUsername);
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
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
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }

    fn list(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}
