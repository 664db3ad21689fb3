//! Table rows for list-style commands.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use zencrypt_core::storage::{EncryptedTextRecord, HashRecord, KeyInfo, PgpKeyInfo};

use crate::ui::Column;

/// First eight characters of an ID, enough to tell rows apart.
pub fn short_id(id: &impl Display) -> String {
    id.to_string().chars().take(8).collect()
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn active_label(active: bool) -> String {
    let label = if active { "active" } else { "inactive" };
    label.to_string()
}

/// Shorten long values for table cells.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub const KEY_COLUMNS: [Column; 3] = [
    Column::new("ID"),
    Column::new("STATUS"),
    Column::new("CREATED"),
];

pub fn key_rows(keys: &[KeyInfo]) -> Vec<Vec<String>> {
    keys.iter()
        .map(|key| {
            vec![
                short_id(&key.id),
                active_label(key.active),
                timestamp(&key.created_at),
            ]
        })
        .collect()
}

pub const PGP_KEY_COLUMNS: [Column; 4] = [
    Column::new("ID"),
    Column::new("FINGERPRINT"),
    Column::new("STATUS"),
    Column::new("CREATED"),
];

pub fn pgp_key_rows(keys: &[PgpKeyInfo]) -> Vec<Vec<String>> {
    keys.iter()
        .map(|key| {
            vec![
                short_id(&key.id),
                truncate(&key.fingerprint, 19),
                active_label(key.active),
                timestamp(&key.created_at),
            ]
        })
        .collect()
}

pub const HASH_COLUMNS: [Column; 4] = [
    Column::new("CREATED"),
    Column::new("TEXT"),
    Column::new("SALT"),
    Column::new("DIGEST"),
];

pub fn hash_rows(records: &[HashRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            vec![
                timestamp(&record.created_at),
                truncate(&record.input_text, 32),
                record.salt.clone().unwrap_or_else(|| "-".to_string()),
                record.digest.clone(),
            ]
        })
        .collect()
}

pub const ENCRYPTED_TEXT_COLUMNS: [Column; 2] = [Column::new("CREATED"), Column::new("TOKEN")];

pub fn encrypted_text_rows(records: &[EncryptedTextRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| vec![timestamp(&record.created_at), record.token.clone()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id(&"0123456789abcdef"), "01234567");
    }
}
