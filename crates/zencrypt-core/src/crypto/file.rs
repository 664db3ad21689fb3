//! Password-based file encryption.
//!
//! Format: `salt (16) ‖ iv (16) ‖ AES-256-GCM ciphertext ‖ tag (16)`.
//! The key is PBKDF2-HMAC-SHA256 of the password and the salt.

use std::fs;
use std::path::Path;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};

use super::kdf::{derive_key, generate_salt, SALT_LENGTH};
use crate::error::{Result, ZencryptError};

/// AES-256-GCM with a 16-byte IV.
type FileCipher = AesGcm<Aes256, U16>;

/// Length of the per-file IV in bytes.
pub const IV_LENGTH: usize = 16;

/// Length of the GCM authentication tag.
pub const TAG_LENGTH: usize = 16;

/// Bytes in front of the ciphertext.
pub const HEADER_LENGTH: usize = SALT_LENGTH + IV_LENGTH;

/// Encrypt `plaintext` under a key derived from `password`.
///
/// A fresh salt and IV are drawn for every call, so encrypting the same
/// input twice gives different output.
pub fn encrypt_bytes(plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    let salt = generate_salt();
    let iv: [u8; IV_LENGTH] = super::random_bytes();
    let key = derive_key(password, &salt)?;

    let cipher = FileCipher::new_from_slice(key.as_bytes())
        .map_err(|e| ZencryptError::Crypto(format!("Cipher init failed: {}", e)))?;
    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), plaintext)
        .map_err(|_| ZencryptError::Crypto("Encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LENGTH + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt bytes produced by [`encrypt_bytes`].
///
/// # Errors
///
/// - `InvalidInput` if the data is shorter than the header plus tag
/// - `AuthenticationFailed` for a wrong password or modified data
pub fn decrypt_bytes(data: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_LENGTH + TAG_LENGTH {
        return Err(ZencryptError::InvalidInput(format!(
            "Encrypted data too short: {} bytes (minimum {})",
            data.len(),
            HEADER_LENGTH + TAG_LENGTH
        )));
    }

    let (salt, rest) = data.split_at(SALT_LENGTH);
    let (iv, ciphertext) = rest.split_at(IV_LENGTH);
    let key = derive_key(password, salt)?;

    let cipher = FileCipher::new_from_slice(key.as_bytes())
        .map_err(|e| ZencryptError::Crypto(format!("Cipher init failed: {}", e)))?;
    cipher
        .decrypt(Nonce::<U16>::from_slice(iv), ciphertext)
        .map_err(|_| ZencryptError::AuthenticationFailed)
}

/// Encrypt the file at `input` and write the result to `output` atomically.
///
/// Returns the number of bytes written.
pub fn encrypt_file(input: &Path, output: &Path, password: &[u8]) -> Result<usize> {
    let _span = tracing::info_span!("encrypt_file", input = %input.display()).entered();

    let plaintext = fs::read(input)?;
    let encrypted = encrypt_bytes(&plaintext, password)?;
    crate::fs::write_atomic(output, &encrypted)?;

    tracing::info!(
        output = %output.display(),
        bytes = encrypted.len(),
        "file encrypted"
    );
    Ok(encrypted.len())
}

/// Decrypt the file at `input` and write the plaintext to `output` atomically.
///
/// Nothing is written when authentication fails.
pub fn decrypt_file(input: &Path, output: &Path, password: &[u8]) -> Result<usize> {
    let _span = tracing::info_span!("decrypt_file", input = %input.display()).entered();

    let data = fs::read(input)?;
    let plaintext = match decrypt_bytes(&data, password) {
        Ok(plaintext) => plaintext,
        Err(err) => {
            tracing::debug!(error = %err, "file decryption failed");
            return Err(err);
        }
    };
    crate::fs::write_atomic(output, &plaintext)?;

    tracing::info!(
        output = %output.display(),
        bytes = plaintext.len(),
        "file decrypted"
    );
    Ok(plaintext.len())
}
