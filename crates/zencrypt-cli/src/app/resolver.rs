//! Path resolution for the config file, key file and store.
//!
//! Flags and their environment variables win over the config file, which
//! wins over the XDG defaults.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_keyfile_path, default_store_path, ZencryptConfig};

/// Resolve the config file path (`--config` / ZENCRYPT_CONFIG, then XDG).
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Resolve the symmetric key file path.
pub fn resolve_keyfile_path(cli: &Cli, config: &ZencryptConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.keyfile {
        return Ok(path.clone());
    }
    match non_empty(config.keys.keyfile.as_deref()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_keyfile_path(),
    }
}

/// Resolve the store database path.
pub fn resolve_store_path(cli: &Cli, config: &ZencryptConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.store {
        return Ok(path.clone());
    }
    match non_empty(config.store.path.as_deref()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_store_path(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!("No store found at {}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_beats_config() {
        let cli = Cli::parse_from(["zencrypt", "--store", "/flag.db", "hash", "x"]);
        let mut config = ZencryptConfig::default();
        config.store.path = Some("/config.db".to_string());

        assert_eq!(
            resolve_store_path(&cli, &config).unwrap(),
            PathBuf::from("/flag.db")
        );
    }

    #[test]
    fn test_config_used_without_flag() {
        let cli = Cli::parse_from(["zencrypt", "--store", "/flag.db", "hash", "x"]);
        let mut config = ZencryptConfig::default();
        config.keys.keyfile = Some("/config.key".to_string());

        assert_eq!(
            resolve_keyfile_path(&cli, &config).unwrap(),
            PathBuf::from("/config.key")
        );
    }

    #[test]
    fn test_blank_config_value_ignored() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" /a ")), Some("/a"));
    }
}
