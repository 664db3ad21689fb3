//! Cryptographic operations for Zencrypt.
//!
//! Every primitive comes from an audited RustCrypto crate; this module only
//! wires them together with fixed parameters:
//! - **Fernet**: AES-128-CBC + HMAC-SHA256 tokens for short text
//! - **PBKDF2-HMAC-SHA256**: 100,000 rounds, 32-byte output
//! - **File cipher**: AES-256-GCM under a PBKDF2 key, `salt ‖ iv` header
//! - **PGP-style**: RSA-2048 with OAEP/SHA-256
//!
//! ## Security Model
//!
//! - Key material is zeroized from memory on drop
//! - Salts and IVs are drawn from the OS RNG for every encryption
//! - Every decryption path authenticates before returning plaintext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to the key file or the store

pub mod fernet;
pub mod file;
pub mod kdf;
pub mod password;
pub mod pgp;

pub use fernet::{Fernet, FernetKey};
pub use file::{decrypt_bytes, decrypt_file, encrypt_bytes, encrypt_file};
pub use kdf::{derive_key, generate_salt, DerivedKey};
pub use password::validate_password;
pub use pgp::{PgpKeyPair, PgpPublicKey};

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a fixed-size array from the OS RNG.
pub(crate) fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
