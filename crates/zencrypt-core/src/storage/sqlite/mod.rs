//! SQLite store backend.
//!
//! The database file lives on disk with owner-only permissions. Key
//! replacement (rotation, import, new PGP pair) deactivates the old row and
//! inserts the new one inside a single transaction; the partial unique
//! indexes reject a second active row if that ever goes wrong.

mod row;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::fernet::FernetKey;
use crate::crypto::password::{hash_password, validate_password, verify_password};
use crate::crypto::pgp::{PgpKeyPair, PgpPublicKey};
use crate::error::{Result, ZencryptError};
use crate::storage::traits::KeyStore;
use crate::storage::types::{
    EncryptedTextRecord, HashRecord, KeyInfo, NewHashRecord, PgpKeyInfo, Session, User,
};

use row::{parse_timestamp, parse_uuid, EncryptedTextRow, HashRow, KeyRow, PgpKeyRow};

/// Store schema version recorded in `meta`.
const FORMAT_VERSION: &str = "1";

/// Longest accepted username.
const MAX_USERNAME_LENGTH: usize = 64;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS keys (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        key_material TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,

        FOREIGN KEY(user_id) REFERENCES users(id)
    );

    -- One active symmetric key per user
    CREATE UNIQUE INDEX IF NOT EXISTS keys_one_active
    ON keys (user_id)
    WHERE active = 1;

    CREATE TABLE IF NOT EXISTS hashes (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        input_text TEXT NOT NULL,
        salt TEXT,
        digest TEXT NOT NULL,
        created_at TEXT NOT NULL,

        FOREIGN KEY(user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS encrypted_texts (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        token TEXT NOT NULL,
        created_at TEXT NOT NULL,

        FOREIGN KEY(user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS pgp_keys (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        private_pem TEXT NOT NULL,
        public_pem TEXT NOT NULL,
        fingerprint TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,

        FOREIGN KEY(user_id) REFERENCES users(id)
    );

    -- One active PGP key pair per user
    CREATE UNIQUE INDEX IF NOT EXISTS pgp_keys_one_active
    ON pgp_keys (user_id)
    WHERE active = 1;
"#;

/// SQLite-backed [`KeyStore`].
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `path`, creating the file and schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let is_new = !path.exists();

        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        if is_new {
            crate::fs::set_owner_only(path)?;
            tracing::info!(path = %path.display(), "created store");
        }
        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway store held in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn initialize(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('format_version', ?)",
            [FORMAT_VERSION],
        )?;

        let version: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )?;
        if version != FORMAT_VERSION {
            return Err(ZencryptError::Storage(format!(
                "Unsupported store format version {}",
                version
            )));
        }
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ZencryptError::Storage("SQLite connection poisoned".to_string()))
    }

    fn validate_username(username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(ZencryptError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(ZencryptError::InvalidInput(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ZencryptError::InvalidInput(
                "Username cannot contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Deactivate the user's active key and insert `key` as the new active one.
    fn replace_active_key(tx: &Transaction<'_>, user_id: Uuid, key: &FernetKey) -> Result<Uuid> {
        tx.execute(
            "UPDATE keys SET active = 0 WHERE user_id = ? AND active = 1",
            [user_id.to_string()],
        )?;

        let id = Uuid::new_v4();
        let material = Zeroizing::new(key.to_base64());
        tx.execute(
            r#"
            INSERT INTO keys (id, user_id, key_material, active, created_at)
            VALUES (?, ?, ?, 1, ?)
            "#,
            (
                id.to_string(),
                user_id.to_string(),
                material.as_str(),
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(id)
    }

    fn sql_limit(limit: Option<usize>) -> i64 {
        // SQLite treats a negative LIMIT as unbounded
        limit
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }
}

impl KeyStore for SqliteStore {
    fn register_user(&mut self, username: &str, password: &str) -> Result<User> {
        Self::validate_username(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let exists: Option<String> = tx
            .query_row(
                "SELECT id FROM users WHERE username = ?",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(ZencryptError::UserExists(username.to_string()));
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        tx.execute(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                username,
                password_hash,
                created_at.to_rfc3339(),
            ),
        )?;
        Self::replace_active_key(&tx, id, &FernetKey::generate())?;

        tx.commit()?;

        tracing::info!(username, "registered user");
        Ok(User {
            id,
            username: username.to_string(),
            created_at,
        })
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let conn = self.lock_conn()?;

        let found: Option<(String, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?",
                [username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (id, password_hash) =
            found.ok_or_else(|| ZencryptError::UserNotFound(username.to_string()))?;

        if !verify_password(password, &password_hash)? {
            tracing::warn!(username, "authentication failed");
            return Err(ZencryptError::InvalidCredentials);
        }

        tracing::debug!(username, "authenticated");
        Ok(Session::new(parse_uuid(&id, "user")?, username.to_string()))
    }

    fn active_key(&self, session: &Session) -> Result<FernetKey> {
        let conn = self.lock_conn()?;

        let material: Option<String> = conn
            .query_row(
                "SELECT key_material FROM keys WHERE user_id = ? AND active = 1",
                [session.user_id().to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let material = Zeroizing::new(material.ok_or(ZencryptError::NoActiveKey("symmetric"))?);

        FernetKey::from_base64(&material)
            .map_err(|e| ZencryptError::Storage(format!("Stored key is corrupt: {}", e)))
    }

    fn rotate_key(&mut self, session: &Session) -> Result<FernetKey> {
        let key = FernetKey::generate();

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let id = Self::replace_active_key(&tx, session.user_id(), &key)?;
        tx.commit()?;

        tracing::info!(username = session.username(), key_id = %id, "rotated key");
        Ok(key)
    }

    fn import_key(&mut self, session: &Session, key: &FernetKey) -> Result<Uuid> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let id = Self::replace_active_key(&tx, session.user_id(), key)?;
        tx.commit()?;

        tracing::info!(username = session.username(), key_id = %id, "imported key");
        Ok(id)
    }

    fn list_keys(&self, session: &Session) -> Result<Vec<KeyInfo>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, active, created_at
            FROM keys
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;
        let rows = stmt.query_map([session.user_id().to_string()], |row| {
            Ok(KeyRow {
                id: row.get(0)?,
                active: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(KeyInfo::try_from(row?)?);
        }
        Ok(keys)
    }

    fn record_hash(&mut self, session: &Session, record: &NewHashRecord) -> Result<Uuid> {
        let conn = self.lock_conn()?;

        let id = Uuid::new_v4();
        conn.execute(
            r#"
            INSERT INTO hashes (id, user_id, input_text, salt, digest, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            (
                id.to_string(),
                session.user_id().to_string(),
                &record.input_text,
                &record.salt,
                &record.digest,
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(id)
    }

    fn list_hashes(&self, session: &Session, limit: Option<usize>) -> Result<Vec<HashRecord>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, input_text, salt, digest, created_at
            FROM hashes
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map(
            (session.user_id().to_string(), Self::sql_limit(limit)),
            |row| {
                Ok(HashRow {
                    id: row.get(0)?,
                    input_text: row.get(1)?,
                    salt: row.get(2)?,
                    digest: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(HashRecord::try_from(row?)?);
        }
        Ok(records)
    }

    fn record_encrypted_text(&mut self, session: &Session, token: &str) -> Result<Uuid> {
        let conn = self.lock_conn()?;

        let id = Uuid::new_v4();
        conn.execute(
            "INSERT INTO encrypted_texts (id, user_id, token, created_at) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                session.user_id().to_string(),
                token,
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(id)
    }

    fn list_encrypted_texts(
        &self,
        session: &Session,
        limit: Option<usize>,
    ) -> Result<Vec<EncryptedTextRecord>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, token, created_at
            FROM encrypted_texts
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map(
            (session.user_id().to_string(), Self::sql_limit(limit)),
            |row| {
                Ok(EncryptedTextRow {
                    id: row.get(0)?,
                    token: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(EncryptedTextRecord::try_from(row?)?);
        }
        Ok(records)
    }

    fn store_pgp_key(&mut self, session: &Session, pair: &PgpKeyPair) -> Result<PgpKeyInfo> {
        let private_pem = pair.private_key_pem()?;
        let public_pem = pair.public_key().to_pem()?;
        let fingerprint = pair.public_key().fingerprint()?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE pgp_keys SET active = 0 WHERE user_id = ? AND active = 1",
            [session.user_id().to_string()],
        )?;

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        tx.execute(
            r#"
            INSERT INTO pgp_keys (id, user_id, private_pem, public_pem, fingerprint, active, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
            (
                id.to_string(),
                session.user_id().to_string(),
                private_pem.as_str(),
                public_pem,
                &fingerprint,
                created_at.to_rfc3339(),
            ),
        )?;

        tx.commit()?;

        tracing::info!(username = session.username(), %fingerprint, "stored PGP key pair");
        Ok(PgpKeyInfo {
            id,
            fingerprint,
            active: true,
            created_at,
        })
    }

    fn active_pgp_key(&self, session: &Session) -> Result<PgpKeyPair> {
        let conn = self.lock_conn()?;

        let pem: Option<String> = conn
            .query_row(
                "SELECT private_pem FROM pgp_keys WHERE user_id = ? AND active = 1",
                [session.user_id().to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let pem = Zeroizing::new(pem.ok_or(ZencryptError::NoActiveKey("PGP"))?);

        PgpKeyPair::from_private_pem(&pem)
    }

    fn public_key_for(&self, username: &str) -> Result<PgpPublicKey> {
        let conn = self.lock_conn()?;

        let user_id: Option<String> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        let user_id = user_id.ok_or_else(|| ZencryptError::UserNotFound(username.to_string()))?;

        let pem: Option<String> = conn
            .query_row(
                "SELECT public_pem FROM pgp_keys WHERE user_id = ? AND active = 1",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;

        PgpPublicKey::from_pem(&pem.ok_or(ZencryptError::NoActiveKey("PGP"))?)
    }

    fn list_pgp_keys(&self, session: &Session) -> Result<Vec<PgpKeyInfo>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, fingerprint, active, created_at
            FROM pgp_keys
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;
        let rows = stmt.query_map([session.user_id().to_string()], |row| {
            Ok(PgpKeyRow {
                id: row.get(0)?,
                fingerprint: row.get(1)?,
                active: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(PgpKeyInfo::try_from(row?)?);
        }
        Ok(keys)
    }
}

impl SqliteStore {
    /// Look up a user by name.
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;

        let found: Option<(String, String)> = conn
            .query_row(
                "SELECT id, created_at FROM users WHERE username = ?",
                [username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        found
            .map(|(id, created_at)| {
                Ok(User {
                    id: parse_uuid(&id, "user")?,
                    username: username.to_string(),
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct-horse-battery";

    fn store_with_user(username: &str) -> (SqliteStore, Session) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.register_user(username, PASSWORD).unwrap();
        let session = store.authenticate(username, PASSWORD).unwrap();
        (store, session)
    }

    fn active_count(store: &SqliteStore, table: &str, session: &Session) -> i64 {
        let conn = store.lock_conn().unwrap();
        conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE user_id = ? AND active = 1",
                table
            ),
            [session.user_id().to_string()],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_register_creates_first_key() {
        let (store, session) = store_with_user("alice");
        assert_eq!(session.username(), "alice");
        assert!(store.active_key(&session).is_ok());
        assert_eq!(store.list_keys(&session).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (mut store, _) = store_with_user("alice");
        let result = store.register_user("alice", "another-password");
        assert!(matches!(result, Err(ZencryptError::UserExists(_))));
    }

    #[test]
    fn test_invalid_registration_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.register_user("", PASSWORD),
            Err(ZencryptError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register_user("has space", PASSWORD),
            Err(ZencryptError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register_user("bob", "short"),
            Err(ZencryptError::InvalidInput(_))
        ));
        assert!(store.find_user("bob").unwrap().is_none());
    }

    #[test]
    fn test_authenticate_failures() {
        let (store, _) = store_with_user("alice");
        assert!(matches!(
            store.authenticate("alice", "wrong-password"),
            Err(ZencryptError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("nobody", PASSWORD),
            Err(ZencryptError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_password_not_stored_in_clear() {
        let (store, _) = store_with_user("alice");
        let conn = store.lock_conn().unwrap();
        let stored: String = conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = 'alice'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!stored.contains(PASSWORD));
        assert!(stored.starts_with("$argon2"));
    }

    #[test]
    fn test_rotation_keeps_one_active_key() {
        let (mut store, session) = store_with_user("alice");
        let original = store.active_key(&session).unwrap();

        let rotated = store.rotate_key(&session).unwrap();
        store.rotate_key(&session).unwrap();

        assert_ne!(original, rotated);
        assert_eq!(active_count(&store, "keys", &session), 1);
        let keys = store.list_keys(&session).unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys.iter().filter(|k| k.active).count(), 1);
        assert!(keys[0].active);
    }

    #[test]
    fn test_import_replaces_active_key() {
        let (mut store, session) = store_with_user("alice");
        let imported = FernetKey::generate();

        store.import_key(&session, &imported).unwrap();

        assert_eq!(store.active_key(&session).unwrap(), imported);
        assert_eq!(active_count(&store, "keys", &session), 1);
    }

    #[test]
    fn test_second_active_key_rejected_by_index() {
        let (store, session) = store_with_user("alice");
        let conn = store.lock_conn().unwrap();
        let result = conn.execute(
            "INSERT INTO keys (id, user_id, key_material, active, created_at) VALUES (?, ?, 'x', 1, 'now')",
            (Uuid::new_v4().to_string(), session.user_id().to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_keys_isolated_per_user() {
        let (mut store, alice) = store_with_user("alice");
        store.register_user("bob", PASSWORD).unwrap();
        let bob = store.authenticate("bob", PASSWORD).unwrap();

        assert_ne!(
            store.active_key(&alice).unwrap(),
            store.active_key(&bob).unwrap()
        );
        store.rotate_key(&alice).unwrap();
        assert_eq!(store.list_keys(&bob).unwrap().len(), 1);
    }

    #[test]
    fn test_hash_history_newest_first_with_limit() {
        let (mut store, session) = store_with_user("alice");
        store
            .record_hash(&session, &NewHashRecord::new("first", "", "d1"))
            .unwrap();
        store
            .record_hash(&session, &NewHashRecord::new("second", "pepper", "d2"))
            .unwrap();

        let all = store.list_hashes(&session, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].input_text, "second");
        assert_eq!(all[0].salt.as_deref(), Some("pepper"));
        assert_eq!(all[1].salt, None);

        let limited = store.list_hashes(&session, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].digest, "d2");
    }

    #[test]
    fn test_encrypted_text_history() {
        let (mut store, session) = store_with_user("alice");
        store.record_encrypted_text(&session, "gAAAAA-token").unwrap();

        let records = store.list_encrypted_texts(&session, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, "gAAAAA-token");
    }

    #[test]
    fn test_pgp_key_storage() {
        let (mut store, session) = store_with_user("alice");
        assert!(matches!(
            store.active_pgp_key(&session),
            Err(ZencryptError::NoActiveKey("PGP"))
        ));

        let pair = PgpKeyPair::generate().unwrap();
        let info = store.store_pgp_key(&session, &pair).unwrap();
        assert_eq!(info.fingerprint, pair.public_key().fingerprint().unwrap());

        let loaded = store.active_pgp_key(&session).unwrap();
        let public = store.public_key_for("alice").unwrap();
        let ciphertext = public.encrypt("to alice").unwrap();
        assert_eq!(loaded.decrypt(&ciphertext).unwrap(), "to alice");

        store.store_pgp_key(&session, &pair).unwrap();
        assert_eq!(active_count(&store, "pgp_keys", &session), 1);
        assert_eq!(store.list_pgp_keys(&session).unwrap().len(), 2);
    }

    #[test]
    fn test_public_key_for_unknown_user() {
        let (store, _) = store_with_user("alice");
        assert!(matches!(
            store.public_key_for("mallory"),
            Err(ZencryptError::UserNotFound(_))
        ));
        assert!(matches!(
            store.public_key_for("alice"),
            Err(ZencryptError::NoActiveKey("PGP"))
        ));
    }
}
