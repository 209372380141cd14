//! Password hashing
//!
//! Argon2id with a fresh random salt per hash, stored as a PHC string.
//! Both operations are CPU-bound, so they run on tokio's blocking pool
//! instead of on the async workers.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::constants::{DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB};
use crate::error::{GatehouseError, Result};

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new() -> Result<Self> {
        Self::with_cost(DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_ITERATIONS)
    }

    /// Build a hasher with explicit Argon2 memory (KiB) and iteration costs
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| GatehouseError::ConfigError(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a plaintext password into a PHC string
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| GatehouseError::Internal(format!("Failed to hash password: {}", e)))
        })
        .await?
    }

    /// Check a plaintext password against a stored PHC string.
    ///
    /// An unparseable stored hash counts as a mismatch.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        let matched = tokio::task::spawn_blocking(move || {
            let parsed = match PasswordHash::new(&hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("Stored password hash is malformed: {}", e);
                    return false;
                }
            };
            // The PHC string carries its own cost parameters; ours only seed the instance.
            Self::argon2(params)
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .await?;

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("correct horse").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
        assert!(hasher.verify("correct horse", &hash).await.unwrap());
        assert!(!hasher.verify("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let hasher = cheap();
        let a = hasher.hash("secret1").await.unwrap();
        let b = hasher.hash("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        let hasher = cheap();
        assert!(!hasher.verify("anything", "not-a-phc-string").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_hashing() {
        let hasher = cheap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let hasher = hasher.clone();
                tokio::spawn(async move { hasher.hash(&format!("password-{}", i)).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[test]
    fn test_invalid_cost_is_config_error() {
        assert!(matches!(
            PasswordHasher::with_cost(1, 0),
            Err(GatehouseError::ConfigError(_))
        ));
    }
}
