use tempfile::tempdir;
use zencrypt_core::storage::NewHashRecord;
use zencrypt_core::{Fernet, KeyStore, SqliteStore, ZencryptError};

const PASSWORD: &str = "store-password-123";

#[test]
fn test_store_persists_across_reopen() {
    let dir = tempdir().expect("tempdir should be available");
    let path = dir.path().join("data").join("zencrypt.db");

    let token = {
        let mut store = SqliteStore::open(&path).expect("open should succeed");
        store
            .register_user("alice", PASSWORD)
            .expect("register should succeed");
        let session = store
            .authenticate("alice", PASSWORD)
            .expect("authenticate should succeed");
        store
            .record_hash(&session, &NewHashRecord::new("hello", "", "digest"))
            .expect("record should succeed");
        Fernet::new(store.active_key(&session).expect("key should exist"))
            .encrypt_text("persisted")
            .expect("encrypt should succeed")
    };

    let store = SqliteStore::open(&path).expect("reopen should succeed");
    let session = store
        .authenticate("alice", PASSWORD)
        .expect("authenticate should succeed");
    let fernet = Fernet::new(store.active_key(&session).expect("key should exist"));
    assert_eq!(fernet.decrypt_text(&token).expect("decrypt should succeed"), "persisted");
    assert_eq!(store.list_hashes(&session, None).expect("list should succeed").len(), 1);
}

#[test]
fn test_rotated_key_cannot_read_old_tokens() {
    let mut store = SqliteStore::open_in_memory().expect("open should succeed");
    store
        .register_user("alice", PASSWORD)
        .expect("register should succeed");
    let session = store
        .authenticate("alice", PASSWORD)
        .expect("authenticate should succeed");

    let old = Fernet::new(store.active_key(&session).expect("key should exist"));
    let token = old.encrypt_text("before rotation").expect("encrypt should succeed");

    let new = Fernet::new(store.rotate_key(&session).expect("rotate should succeed"));
    assert!(matches!(new.decrypt_text(&token), Err(ZencryptError::InvalidToken)));
    assert_eq!(
        store.active_key(&session).expect("key should exist"),
        *new.key()
    );
}

#[cfg(unix)]
#[test]
fn test_store_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("tempdir should be available");
    let path = dir.path().join("zencrypt.db");
    SqliteStore::open(&path).expect("open should succeed");

    let mode = std::fs::metadata(&path)
        .expect("metadata should be readable")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
