//! Authentication for the pcbook server.
//!
//! Provides password hashing, role definitions and JWT access-token
//! issuance/validation.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod role;

pub use claims::Claims;
pub use jwt::JwtManager;
pub use role::Role;

use thiserror::Error;

/// Failures raised while hashing passwords or minting tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
