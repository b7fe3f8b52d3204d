//! Password hashing using argon2
//!
//! Hashes are stored in PHC string format, so the salt and parameters
//! travel with the hash and verification needs nothing else.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

/// Stands in for a stored hash when the account does not exist
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Password hashing service (Argon2id, random salt per hash)
pub struct PasswordService;

impl PasswordService {
    /// Hash a plaintext password (blocking, CPU-bound)
    pub fn hash(plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash (blocking, CPU-bound)
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    pub fn verify(hash: &str, plaintext: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }

    /// Do the work of a real check with no stored hash; always a mismatch
    pub fn verify_missing(plaintext: &str) -> Result<bool> {
        let hash = match DUMMY_HASH.get() {
            Some(hash) => hash,
            None => {
                let hash = Self::hash("no-such-account")?;
                DUMMY_HASH.get_or_init(|| hash)
            }
        };
        Self::verify(hash, plaintext)?;
        Ok(false)
    }

    /// [`Self::hash`] on the blocking thread pool
    pub async fn hash_async(plaintext: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&plaintext))
            .await
            .context("password hashing task failed")?
    }

    /// [`Self::verify`] on the blocking thread pool
    pub async fn verify_async(hash: String, plaintext: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&hash, &plaintext))
            .await
            .context("password verification task failed")?
    }

    /// [`Self::verify_missing`] on the blocking thread pool
    pub async fn verify_missing_async(plaintext: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify_missing(&plaintext))
            .await
            .context("password verification task failed")?
    }
}
