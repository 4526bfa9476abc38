//! Password hashing using argon2
//!
//! Provides secure password hashing and verification.
//!
//! New digests are Argon2id PHC strings. Digests in the bcrypt modular
//! format (`$2a$`, `$2b$`, `$2y$`), as stored by the previous service, are
//! still accepted by [`PasswordService::verify`].
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers use the `_async`
//! variants, which run on the blocking thread pool.

use crate::config::PasswordConfig;
use crate::error::AccountError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
/// It provides resistance against both side-channel and GPU-based attacks.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(&PasswordConfig::default())
    }
}

impl PasswordService {
    /// Cost parameters are checked when hashing, so a misconfigured service
    /// fails every `hash` call with `AccountError::Hashing`.
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, AccountError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AccountError::Hashing(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AccountError::Hashing(format!("failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(&self, password: String) -> Result<String, AccountError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| AccountError::Hashing(format!("task join error: {}", e)))?
    }

    /// Verify a password against a stored digest (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch. Only a malformed digest is an error.
    pub fn verify(password: &str, digest: &str) -> Result<bool, AccountError> {
        if BCRYPT_PREFIXES.iter().any(|prefix| digest.starts_with(prefix)) {
            return bcrypt::verify(password, digest)
                .map_err(|e| AccountError::Hashing(format!("invalid bcrypt digest: {}", e)));
        }

        let parsed = PasswordHash::new(digest)
            .map_err(|e| AccountError::Hashing(format!("invalid hash format: {}", e)))?;

        // Parameters come from the PHC string, not from this service's config.
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AccountError::Hashing(format!("failed to verify password: {}", e))),
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, digest: String) -> Result<bool, AccountError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &digest))
            .await
            .map_err(|e| AccountError::Hashing(format!("task join error: {}", e)))?
    }
}
