//! SHA-256 text digests.
//!
//! A digest is the lowercase hex SHA-256 of `text ‖ salt`, both taken as
//! UTF-8. Verification always recomputes; stored digests are never trusted.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of `text` concatenated with `salt`.
///
/// An empty salt hashes the text alone.
///
/// # Examples
///
/// ```
/// use zencrypt_core::hash::digest;
///
/// assert_eq!(digest("hello", "xyz"), digest("helloxyz", ""));
/// ```
pub fn digest(text: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Recompute the digest of `text ‖ salt` and compare it to `expected`.
///
/// Surrounding whitespace and hex letter case in `expected` are ignored.
pub fn verify(text: &str, salt: &str, expected: &str) -> bool {
    digest(text, salt).eq_ignore_ascii_case(expected.trim())
}
