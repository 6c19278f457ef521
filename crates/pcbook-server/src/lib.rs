//! pcbook Server Library
//!
//! Core functionality for the pcbook catalog server:
//! - In-memory stores for users, laptops, ratings and images
//! - Argon2 password hashing and JWT access tokens
//! - Chunked image upload under a size ceiling
//! - gRPC services (Auth, Laptop) and the role-checking interceptor

pub mod auth;
pub mod context;
pub mod server;
pub mod storage;
pub mod upload;

use auth::{AuthError, Role};
use storage::{StoreError, User, UserStore};

/// Accounts created at startup: (username, password, role).
pub const SEED_USERS: &[(&str, &str, Role)] = &[
    ("admin1", "secret", Role::Admin),
    ("user1", "secret", Role::User),
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Insert every entry of [`SEED_USERS`] into `users`.
pub async fn seed_users(users: &UserStore) -> Result<(), SeedError> {
    for &(username, password, role) in SEED_USERS {
        users.save(&User::new(username, password, role)?).await?;
    }
    Ok(())
}
