//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings, which carry their own algorithm, parameters and salt.
//! Request handlers use the async [`PasswordService::hash`] and [`PasswordService::verify`],
//! which move the CPU-heavy work onto tokio's blocking pool.

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashes and verifies passwords
#[derive(Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Creates a service with the default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Password(e.to_string()))
    }

    /// Checks `password` against a stored PHC hash.
    ///
    /// A wrong password is `Ok(false)`; only a malformed hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| Error::Password(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Password(e.to_string())),
        }
    }

    /// [`Self::hash_password`] on the blocking thread pool.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let service = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| Error::Password(format!("hashing task failed: {e}")))?
    }

    /// [`Self::verify_password`] on the blocking thread pool.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let service = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| Error::Password(format!("verification task failed: {e}")))?
    }
}
