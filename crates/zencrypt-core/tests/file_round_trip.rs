use std::fs;

use tempfile::tempdir;
use zencrypt_core::crypto::file::HEADER_LENGTH;
use zencrypt_core::crypto::{decrypt_file, encrypt_file};
use zencrypt_core::ZencryptError;

#[test]
fn test_file_round_trip() {
    let dir = tempdir().expect("tempdir should be available");
    let input = dir.path().join("notes.txt");
    let encrypted = dir.path().join("notes.txt.enc");
    let restored = dir.path().join("notes.restored.txt");
    let contents = b"line one\nline two\n\x00\xff binary tail";
    fs::write(&input, contents).expect("write should succeed");

    let written = encrypt_file(&input, &encrypted, b"file-password").expect("encrypt should succeed");
    let on_disk = fs::read(&encrypted).expect("read should succeed");
    assert_eq!(written, on_disk.len());
    assert!(on_disk.len() > HEADER_LENGTH);
    assert_ne!(&on_disk[HEADER_LENGTH..], &contents[..]);

    decrypt_file(&encrypted, &restored, b"file-password").expect("decrypt should succeed");
    assert_eq!(fs::read(&restored).expect("read should succeed"), contents);
}

#[test]
fn test_wrong_password_writes_nothing() {
    let dir = tempdir().expect("tempdir should be available");
    let input = dir.path().join("secret.bin");
    let encrypted = dir.path().join("secret.bin.enc");
    let restored = dir.path().join("secret.out");
    fs::write(&input, b"top secret").expect("write should succeed");
    encrypt_file(&input, &encrypted, b"right-password").expect("encrypt should succeed");

    let result = decrypt_file(&encrypted, &restored, b"wrong-password");

    assert!(matches!(result, Err(ZencryptError::AuthenticationFailed)));
    assert!(!restored.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempdir().expect("tempdir should be available");
    let result = encrypt_file(
        &dir.path().join("does-not-exist"),
        &dir.path().join("out"),
        b"password",
    );
    assert!(matches!(result, Err(ZencryptError::Io { .. })));
}

#[test]
fn test_truncated_file_is_invalid_input() {
    let dir = tempdir().expect("tempdir should be available");
    let input = dir.path().join("short.enc");
    fs::write(&input, [0u8; 20]).expect("write should succeed");

    let result = decrypt_file(&input, &dir.path().join("out"), b"password");
    assert!(matches!(result, Err(ZencryptError::InvalidInput(_))));
}
