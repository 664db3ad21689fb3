//! The local symmetric key file.
//!
//! Holds one Fernet key as URL-safe base64 text. Created on first use with
//! owner-only permissions; later runs load the same key.

use std::fs;
use std::io;
use std::path::Path;

use crate::crypto::fernet::FernetKey;
use crate::error::{Result, ZencryptError};

/// Read the key stored at `path`.
pub fn read(path: &Path) -> Result<FernetKey> {
    let text = fs::read_to_string(path)?;
    FernetKey::from_base64(&text).map_err(|e| match e {
        ZencryptError::InvalidKey(msg) => {
            ZencryptError::InvalidKey(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}

/// Write `key` to `path` atomically with 0600 permissions.
pub fn write(path: &Path, key: &FernetKey) -> Result<()> {
    let encoded = zeroize::Zeroizing::new(key.to_base64());
    crate::fs::write_atomic(path, encoded.as_bytes())?;
    crate::fs::set_owner_only(path)?;
    Ok(())
}

/// Load the key at `path`, generating and persisting a new one if the file
/// does not exist.
///
/// Returns the key and whether it was newly created.
pub fn load_or_create(path: &Path) -> Result<(FernetKey, bool)> {
    match read(path) {
        Ok(key) => {
            tracing::debug!(path = %path.display(), "loaded key file");
            Ok((key, false))
        }
        Err(ZencryptError::Io { source }) if source.kind() == io::ErrorKind::NotFound => {
            let key = FernetKey::generate();
            write(path, &key)?;
            tracing::info!(path = %path.display(), "created new key file");
            Ok((key, true))
        }
        Err(err) => Err(err),
    }
}
