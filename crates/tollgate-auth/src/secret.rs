//! Argon2 hashing for client secrets and user passwords.
//!
//! Directories keep credentials only as PHC strings (`$argon2id$...`).
//! Configuration may supply either a PHC string or a plaintext value; a
//! plaintext value is hashed once when the directory is built.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::AuthResult;
use crate::error::AuthError;

/// Hashes a secret with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `Internal` if hashing fails.
pub fn hash_secret(secret: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("secret hashing failed: {e}")))
}

/// Checks a presented secret against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
///
/// Returns `Internal` if the stored value is not a PHC string.
pub fn verify_secret(secret: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::internal(format!("stored secret is not a PHC hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

/// Returns `true` if the value is already an Argon2 PHC string.
#[must_use]
pub fn is_hashed(value: &str) -> bool {
    PasswordHash::new(value)
        .map(|hash| hash.algorithm.as_str().starts_with("argon2"))
        .unwrap_or(false)
}

/// Returns the value unchanged if it is a PHC string, otherwise its hash.
///
/// # Errors
///
/// Returns `Internal` if hashing fails.
pub fn ensure_hashed(value: &str) -> AuthResult<String> {
    if is_hashed(value) {
        Ok(value.to_string())
    } else {
        hash_secret(value)
    }
}
