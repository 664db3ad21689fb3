//! Store trait definition.
//!
//! `KeyStore` is the interface the CLI talks to for users, their keys and
//! their history. SQLite is the only backend.

use uuid::Uuid;

use super::types::{
    EncryptedTextRecord, HashRecord, KeyInfo, NewHashRecord, PgpKeyInfo, Session, User,
};
use crate::crypto::fernet::FernetKey;
use crate::crypto::pgp::{PgpKeyPair, PgpPublicKey};
use crate::error::Result;

/// Per-user key and history storage.
///
/// Implementations must ensure:
/// - At most one active symmetric key and one active PGP pair per user
/// - Rotation and import replace the active key atomically
/// - Passwords are kept only as salted hashes
pub trait KeyStore: Send + Sync {
    // --- Users ---

    /// Register a user and give them a first symmetric key.
    ///
    /// # Errors
    ///
    /// - `UserExists` if the username is taken
    /// - `InvalidInput` if the username or password is unacceptable
    fn register_user(&mut self, username: &str, password: &str) -> Result<User>;

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` for an unknown username
    /// - `InvalidCredentials` for a wrong password
    fn authenticate(&self, username: &str, password: &str) -> Result<Session>;

    // --- Symmetric keys ---

    /// The user's active Fernet key.
    fn active_key(&self, session: &Session) -> Result<FernetKey>;

    /// Deactivate the current key and activate a freshly generated one.
    fn rotate_key(&mut self, session: &Session) -> Result<FernetKey>;

    /// Deactivate the current key and activate `key`.
    fn import_key(&mut self, session: &Session, key: &FernetKey) -> Result<Uuid>;

    /// All of the user's keys, newest first.
    fn list_keys(&self, session: &Session) -> Result<Vec<KeyInfo>>;

    // --- History ---

    fn record_hash(&mut self, session: &Session, record: &NewHashRecord) -> Result<Uuid>;

    /// Hash records, newest first, optionally capped at `limit`.
    fn list_hashes(&self, session: &Session, limit: Option<usize>) -> Result<Vec<HashRecord>>;

    fn record_encrypted_text(&mut self, session: &Session, token: &str) -> Result<Uuid>;

    /// Encrypted text records, newest first, optionally capped at `limit`.
    fn list_encrypted_texts(
        &self,
        session: &Session,
        limit: Option<usize>,
    ) -> Result<Vec<EncryptedTextRecord>>;

    // --- PGP keys ---

    /// Store `pair` as the user's active PGP key pair, deactivating any previous one.
    fn store_pgp_key(&mut self, session: &Session, pair: &PgpKeyPair) -> Result<PgpKeyInfo>;

    /// The user's active PGP key pair.
    fn active_pgp_key(&self, session: &Session) -> Result<PgpKeyPair>;

    /// Any user's active public key, for encrypting to them.
    fn public_key_for(&self, username: &str) -> Result<PgpPublicKey>;

    fn list_pgp_keys(&self, session: &Session) -> Result<Vec<PgpKeyInfo>>;
}
