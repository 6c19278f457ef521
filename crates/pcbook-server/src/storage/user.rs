use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::StoreError;
use crate::auth::password;
use crate::auth::{AuthError, Role};

/// A user account. The password is only ever held as an argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Create a user, hashing `password`.
    pub fn new(username: &str, password: &str, role: Role) -> Result<Self, AuthError> {
        Ok(Self {
            username: username.to_string(),
            password_hash: password::hash_password(password)?,
            role,
        })
    }

    pub fn verify_password(&self, password: &str) -> Result<bool, AuthError> {
        password::verify_password(password, &self.password_hash)
    }
}

/// Thread-safe credential store keyed by username.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `user`. Usernames are never overwritten.
    pub async fn save(&self, user: &User) -> Result<(), StoreError> {
        match self.users.write().await.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                debug!(username = %user.username, role = %user.role, "User saved");
                Ok(())
            }
        }
    }

    pub async fn find(&self, username: &str) -> Option<User> {
        self.users.read().await.get(username).cloned()
    }
}
