//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Stretches a password into a 32-byte key for the file cipher. The salt is
//! random per encryption and travels in the file header.

use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, ZencryptError};

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the random salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    super::random_bytes()
}

/// Derive a 32-byte key from a password and salt.
///
/// Same password + salt always produces the same key; a different salt
/// produces a different key.
///
/// # Examples
///
/// ```
/// use zencrypt_core::crypto::{derive_key, generate_salt};
///
/// let salt = generate_salt();
/// let key = derive_key(b"correct horse", &salt).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(ZencryptError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(ZencryptError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = b"unique-salt-1234";

        let key1 = derive_key(b"test-password", salt).unwrap();
        let key2 = derive_key(b"test-password", salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();
        assert_ne!(salt1, salt2);

        let key1 = derive_key(b"test-password", &salt1).unwrap();
        let key2 = derive_key(b"test-password", &salt2).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = b"fixed-salt-12345";

        let key1 = derive_key(b"password-one", salt).unwrap();
        let key2 = derive_key(b"password-two", salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_key_length() {
        let key = derive_key(b"test-password", &generate_salt()).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LENGTH);
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key(b"", b"salt-1234567890123456");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Password cannot be empty"));
    }

    #[test]
    fn test_short_salt_rejected() {
        let result = derive_key(b"test-password", b"short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Salt must be at least 16 bytes"));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key(b"test-password", b"salt-1234567890123456").unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
