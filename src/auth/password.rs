//! Argon2id password hashing.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use once_cell::sync::Lazy;

/// Hash compared against when the username does not exist, so both failure
/// paths pay for one verification.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("portal-timing-equalizer").ok());

/// Hash a password into a PHC string with a random salt.
///
/// # Errors
/// Returns an error if the hasher rejects its parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Verify a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|err| anyhow!("invalid password hash: {err}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow!("failed to verify password: {err}")),
    }
}

/// Burn one verification for a user that does not exist.
pub(super) fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() -> Result<()> {
        let hash = hash_password("password")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password", &hash)?);
        assert!(!verify_password("wrong", &hash)?);
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = hash_password("password")?;
        let second = hash_password("password")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn verify_rejects_plaintext_hash() {
        // A legacy plaintext column value is not a PHC string.
        assert!(verify_password("password", "password").is_err());
    }

    #[test]
    fn dummy_verification_does_not_panic() {
        verify_dummy("anything");
    }
}
