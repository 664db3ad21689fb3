//! Application context for the Zencrypt CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file so
//! handlers don't thread paths and flags around individually.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use zencrypt_core::{keyfile, Fernet, SqliteStore};

use crate::cli::Cli;
use crate::config::{read_config, ZencryptConfig};
use crate::errors::{from_core, CliError};
use crate::ui::UiContext;

use super::resolver::{
    missing_store_message, resolve_config_path, resolve_keyfile_path, resolve_store_path,
};
use super::session::UserSession;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<ZencryptConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The `--user` name, if set.
    pub fn user(&self) -> Option<&str> {
        self.cli.user.as_deref()
    }

    /// Get the config file, loading it lazily. A missing file means defaults.
    pub fn config(&self) -> anyhow::Result<&ZencryptConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path(self.cli)?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(ZencryptConfig::default());
            }
            read_config(&path)
        })
    }

    pub fn keyfile_path(&self) -> anyhow::Result<PathBuf> {
        resolve_keyfile_path(self.cli, self.config()?)
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    /// UI context for this invocation.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json)
    }

    /// Build the cipher from the key file, creating the file on first use.
    pub fn keyfile_cipher(&self) -> anyhow::Result<Fernet> {
        let path = self.keyfile_path()?;
        let (key, created) = keyfile::load_or_create(&path).map_err(from_core)?;
        if created && !self.quiet() {
            eprintln!("Created new key file at {}", path.display());
        }
        Ok(Fernet::new(key))
    }

    /// Open (or create) the store.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.store_path()?;
        SqliteStore::open(&path).map_err(from_core)
    }

    /// Open an existing store; a missing file is a not-found error.
    pub fn open_existing_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.store_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&path),
                "Hint: Run `zencrypt user register <NAME>` to create it.",
            )
            .into());
        }
        SqliteStore::open(&path).map_err(from_core)
    }

    /// Log in as `--user`, which must be set.
    pub fn login(&self) -> anyhow::Result<UserSession> {
        let username = self.user().ok_or_else(|| {
            CliError::invalid_input("This command needs a store user. Pass --user or set ZENCRYPT_USER.")
        })?;
        UserSession::login(self.open_existing_store()?, username)
    }

    /// Log in if `--user` is set.
    pub fn login_if_user(&self) -> anyhow::Result<Option<UserSession>> {
        match self.user() {
            Some(_) => self.login().map(Some),
            None => Ok(None),
        }
    }
}
