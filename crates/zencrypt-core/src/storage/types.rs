//! Data types for the per-user store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Proof that a user authenticated against the store.
///
/// Only the store can create one, so holding a `Session` means the password
/// was checked. Per-user operations take it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: Uuid,
    username: String,
}

impl Session {
    pub(crate) fn new(user_id: Uuid, username: String) -> Self {
        Self { user_id, username }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Listing view of a stored symmetric key; the key material is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyInfo {
    pub id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A hash computed on behalf of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashRecord {
    pub id: Uuid,
    pub input_text: String,
    pub salt: Option<String>,
    pub digest: String,
    pub created_at: DateTime<Utc>,
}

/// Builder for recording a hash.
#[derive(Debug, Clone)]
pub struct NewHashRecord {
    pub input_text: String,
    /// Empty salts are stored as `None`
    pub salt: Option<String>,
    pub digest: String,
}

impl NewHashRecord {
    pub fn new(input_text: impl Into<String>, salt: &str, digest: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            salt: (!salt.is_empty()).then(|| salt.to_string()),
            digest: digest.into(),
        }
    }
}

/// A Fernet token produced for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedTextRecord {
    pub id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a stored PGP key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgpKeyInfo {
    pub id: Uuid,
    pub fingerprint: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hash_record_drops_empty_salt() {
        assert_eq!(NewHashRecord::new("t", "", "d").salt, None);
        assert_eq!(
            NewHashRecord::new("t", "pepper", "d").salt.as_deref(),
            Some("pepper")
        );
    }
}
