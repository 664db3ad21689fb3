//! Raw rows from the store and their conversion into domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, ZencryptError};
use crate::storage::types::{EncryptedTextRecord, HashRecord, KeyInfo, PgpKeyInfo};

pub(super) fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| ZencryptError::Storage(format!("Invalid {} UUID: {}", what, e)))
}

pub(super) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| ZencryptError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

#[derive(Debug)]
pub struct KeyRow {
    pub id: String,
    pub active: bool,
    pub created_at: String,
}

impl TryFrom<KeyRow> for KeyInfo {
    type Error = ZencryptError;

    fn try_from(row: KeyRow) -> Result<Self> {
        Ok(KeyInfo {
            id: parse_uuid(&row.id, "key")?,
            active: row.active,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug)]
pub struct HashRow {
    pub id: String,
    pub input_text: String,
    pub salt: Option<String>,
    pub digest: String,
    pub created_at: String,
}

impl TryFrom<HashRow> for HashRecord {
    type Error = ZencryptError;

    fn try_from(row: HashRow) -> Result<Self> {
        Ok(HashRecord {
            id: parse_uuid(&row.id, "hash")?,
            input_text: row.input_text,
            salt: row.salt,
            digest: row.digest,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug)]
pub struct EncryptedTextRow {
    pub id: String,
    pub token: String,
    pub created_at: String,
}

impl TryFrom<EncryptedTextRow> for EncryptedTextRecord {
    type Error = ZencryptError;

    fn try_from(row: EncryptedTextRow) -> Result<Self> {
        Ok(EncryptedTextRecord {
            id: parse_uuid(&row.id, "encrypted text")?,
            token: row.token,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Debug)]
pub struct PgpKeyRow {
    pub id: String,
    pub fingerprint: String,
    pub active: bool,
    pub created_at: String,
}

impl TryFrom<PgpKeyRow> for PgpKeyInfo {
    type Error = ZencryptError;

    fn try_from(row: PgpKeyRow) -> Result<Self> {
        Ok(PgpKeyInfo {
            id: parse_uuid(&row.id, "PGP key")?,
            fingerprint: row.fingerprint,
            active: row.active,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
