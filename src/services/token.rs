//! Stateless session tokens: HS256 JWTs carrying identity and role.
//!
//! Verification takes an explicit `now` so expiry is decided by the caller's
//! clock rather than the library's.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::Role;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Malformed, wrongly signed and expired tokens are deliberately
    /// indistinguishable.
    #[error("Invalid token")]
    Invalid,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    has_secret: bool,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("has_secret", &self.has_secret)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            has_secret: !secret.is_empty(),
            ttl_seconds,
        }
    }

    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn issue(&self, username: &str, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        if !self.has_secret {
            return Err(TokenError::Signing("signing secret is not configured".to_string()));
        }

        let iat = now.timestamp();
        let claims = Claims {
            sub: username.to_string(),
            role: role.as_str().to_string(),
            iat,
            exp: iat + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and algorithm, then that `now` is strictly before `exp`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if !self.has_secret {
            return Err(TokenError::Invalid);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}
