//! Account password rules and password hashing.
//!
//! Store accounts keep only an Argon2id PHC string, never the password.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, ZencryptError};

/// Minimum account password length in characters.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate that an account password meets minimum requirements.
///
/// # Requirements
///
/// - At least 8 characters long
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use zencrypt_core::crypto::validate_password;
///
/// assert!(validate_password("my-secure-password-123").is_ok());
/// assert!(validate_password("short").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(ZencryptError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ZencryptError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

/// Hash an account password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ZencryptError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash is an error; a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| ZencryptError::Storage(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("my-secure-password-123").is_ok());
        assert!(validate_password("longer password with spaces!@#").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password("short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_password("").is_err());
        assert!(validate_password("   ").is_err());
        assert!(validate_password("\n\t").is_err());
    }

    #[test]
    fn test_password_counts_characters_not_bytes() {
        // 4 characters, 8 bytes
        assert!(validate_password("\u{e9}\u{e9}\u{e9}\u{e9}").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let phc = hash_password("correct-password").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("correct-password", &phc).unwrap());
        assert!(!verify_password("wrong-password", &phc).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_phc_is_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
