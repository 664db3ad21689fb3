//! Error types for Zencrypt core operations.
//!
//! Every cryptographic failure is a recoverable variant here; callers decide
//! how to present it. The CLI layer maps these to user-friendly messages and
//! exit codes.

use thiserror::Error;

/// Result type alias for Zencrypt operations.
pub type Result<T> = std::result::Result<T, ZencryptError>;

/// Core error type for Zencrypt operations.
#[derive(Debug, Error)]
pub enum ZencryptError {
    /// Fernet token is malformed, tampered with, expired, or was produced
    /// under a different key
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated file decryption failed (wrong password or modified data)
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    /// RSA-OAEP decryption failed (wrong private key or malformed ciphertext)
    #[error("Decryption failed: wrong private key or malformed ciphertext")]
    DecryptionFailed,

    /// Message exceeds the RSA-OAEP plaintext limit for the key size
    #[error("Message too long: {len} bytes (maximum {max} for this key)")]
    MessageTooLong { len: usize, max: usize },

    /// Key material could not be parsed
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Other cryptographic failure (RNG, key generation, encoding)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No user with the given name
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Username already registered
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Username/password pair did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The user has no active key of the requested kind
    #[error("No active {0} key")]
    NoActiveKey(&'static str),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
