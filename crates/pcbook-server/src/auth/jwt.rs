//! JWT access-token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use super::AuthError;
use super::claims::Claims;
use crate::storage::User;

/// Mints and checks HS256 access tokens.
///
/// Stateless: validity is decided entirely by signature and expiry.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &[u8], token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl_secs,
        }
    }

    pub const fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    /// Issue an access token carrying the user's name and role.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = now_secs();
        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Validate a token and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}
