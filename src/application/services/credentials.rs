//! Credential Hashing
//!
//! Argon2id hashing and verification, constructed from configuration and
//! passed to whoever needs it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Version,
};
use once_cell::sync::OnceCell;

use crate::config::HashingSettings;
use crate::shared::error::AppError;

/// Plaintext behind the dummy hash used to equalize unknown-user lookups.
const DUMMY_PASSWORD: &str = "warbler-dummy-credential";

/// Salted, slow, verifiable password hashing.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    dummy_hash: OnceCell<String>,
}

impl CredentialHasher {
    /// Create a hasher with the configured cost factors.
    pub fn new(settings: &HashingSettings) -> Result<Self, AppError> {
        let params = settings
            .params()
            .map_err(|e| AppError::Internal(format!("Invalid hashing parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: OnceCell::new(),
        })
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a stored PHC string.
    ///
    /// The hash's own parameters are used, so credentials created under
    /// older cost factors keep verifying. Comparison is constant time.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spend one verification on a fixed hash and discard the result.
    ///
    /// Called when the username does not exist so the lookup costs the same
    /// as a wrong password.
    pub fn verify_dummy(&self, password: &str) -> Result<(), AppError> {
        let hash = self.dummy_hash.get_or_try_init(|| self.hash(DUMMY_PASSWORD))?;
        self.verify(password, hash)?;
        Ok(())
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            dummy_hash: OnceCell::new(),
        }
    }
}
