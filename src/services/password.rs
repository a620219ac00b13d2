//! Argon2id password hashing.
//!
//! Hashing is deliberately expensive, so both operations run on the blocking
//! thread pool instead of the async runtime.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Invalid Argon2 params: {0}")]
    Params(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid password hash format: {0}")]
    MalformedDigest(String),

    #[error("Password hashing task panicked: {0}")]
    Join(#[from] task::JoinError),
}

#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, HashError> {
        let params = Params::new(memory_cost_kib, time_cost, parallelism, None)
            .map_err(|e| HashError::Params(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, HashError> {
        Self::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Salted one-way digest in PHC string format.
    pub fn hash_blocking(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; errors only when `digest` is not a PHC string.
    /// Parameters are taken from the digest, so older hashes keep verifying.
    pub fn verify_blocking(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| HashError::MalformedDigest(e.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let hasher = self.clone();
        let plaintext = plaintext.to_string();
        task::spawn_blocking(move || hasher.hash_blocking(&plaintext)).await?
    }

    pub async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        let hasher = self.clone();
        let plaintext = plaintext.to_string();
        let digest = digest.to_string();
        task::spawn_blocking(move || hasher.verify_blocking(&plaintext, &digest)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(64, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_salted_phc_string() {
        let h = hasher();
        let a = h.hash_blocking("password123").unwrap();
        let b = h.hash_blocking("password123").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_matches_and_mismatches() {
        let h = hasher();
        let digest = h.hash_blocking("password123").unwrap();

        assert!(h.verify_blocking("password123", &digest).unwrap());
        assert!(!h.verify_blocking("password124", &digest).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let err = hasher().verify_blocking("password123", "not-a-hash").unwrap_err();
        assert!(matches!(err, HashError::MalformedDigest(_)));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        assert!(matches!(
            Argon2Hasher::new(1, 1, 1),
            Err(HashError::Params(_))
        ));
    }

    #[test]
    fn test_verify_uses_params_from_digest() {
        let digest = Argon2Hasher::new(128, 2, 1)
            .unwrap()
            .hash_blocking("password123")
            .unwrap();

        assert!(hasher().verify_blocking("password123", &digest).unwrap());
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let h = hasher();
        let digest = h.hash("password123").await.unwrap();
        assert!(h.verify("password123", &digest).await.unwrap());
    }
}
