//! Per-user storage for Zencrypt.
//!
//! Users, their symmetric keys, their PGP key pairs and their hash and
//! encryption history live in one SQLite database. Every write that
//! replaces an active key runs in a single transaction, and a partial
//! unique index keeps at most one active key per user.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::KeyStore;
pub use types::{
    EncryptedTextRecord, HashRecord, KeyInfo, NewHashRecord, PgpKeyInfo, Session, User,
};
