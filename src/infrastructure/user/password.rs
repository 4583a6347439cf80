//! Password hashing using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Hashes and verifies login passwords
pub trait PasswordHasher: Send + Sync + Debug {
    /// Produces a PHC-format hash with a fresh salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Whether `password` matches `hash`; malformed hashes never match
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
