//! # Zencrypt Core
//!
//! Core library for Zencrypt - hashing, symmetric encryption, password-based
//! file encryption and RSA "PGP-style" messaging.
//!
//! This crate provides the cryptographic operations and the per-user key
//! store independent of the CLI interface. Every operation takes its key
//! material explicitly; there is no process-wide cipher state.
//!
//! ## Architecture
//!
//! - **hash**: SHA-256 digests of text and an optional salt
//! - **crypto**: Fernet tokens, PBKDF2 key derivation, file cipher, RSA-OAEP
//! - **keyfile**: Loading and persisting the symmetric key file
//! - **storage**: Per-user key, history and PGP key storage (SQLite)

pub mod crypto;
pub mod error;
pub mod fs;
pub mod hash;
pub mod keyfile;
pub mod storage;

pub use crypto::fernet::{Fernet, FernetKey};
pub use crypto::pgp::{PgpKeyPair, PgpPublicKey};
pub use error::{Result, ZencryptError};
pub use storage::{KeyStore, Session, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
