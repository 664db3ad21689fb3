//! Store login for per-user commands.

use zencrypt_core::{Fernet, KeyStore, Session, SqliteStore};

use crate::errors::from_core;
use crate::helpers::prompt_password;

/// An open store together with the authenticated user.
pub struct UserSession {
    pub store: SqliteStore,
    pub session: Session,
}

impl UserSession {
    /// Authenticate `username` with a password from ZENCRYPT_PASSWORD or a prompt.
    pub fn login(store: SqliteStore, username: &str) -> anyhow::Result<Self> {
        let password = prompt_password(&format!("Password for {}", username))?;
        let session = store
            .authenticate(username, &password)
            .map_err(from_core)?;
        Ok(Self { store, session })
    }

    /// Cipher for the user's active key.
    pub fn cipher(&self) -> anyhow::Result<Fernet> {
        let key = self.store.active_key(&self.session).map_err(from_core)?;
        Ok(Fernet::new(key))
    }

    pub fn username(&self) -> &str {
        self.session.username()
    }
}
