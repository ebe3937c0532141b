//! Argon2id password hashing and verification
//!
//! Hashes are stored in PHC string format, so the algorithm parameters and
//! salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use lingodesk_common::{Error, Result};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a plaintext password against a stored PHC hash
///
/// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Error::CorruptRecord(format!("Stored password hash is invalid: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`] characters
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
