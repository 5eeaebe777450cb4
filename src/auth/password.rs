//! Password hashing and verification
//!
//! Argon2id with a per-hash random salt embedded in the PHC output string,
//! so verification needs no separately stored salt.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, RustyGateError};

/// Hashes a plaintext password into a self-describing PHC string
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RustyGateError::HashingError(format!("Failed to hash password: {}", e)))
}

/// Verifies a plaintext password against a stored hash.
///
/// The comparison inside the argon2 crate is constant-time. A malformed
/// stored hash verifies as false rather than surfacing an error; callers
/// must not learn why verification failed.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}
