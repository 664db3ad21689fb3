//! Fernet authenticated symmetric tokens.
//!
//! Token layout before URL-safe base64 encoding:
//!
//! ```text
//! 0x80 | timestamp (u64 BE) | IV (16) | AES-128-CBC/PKCS7 ciphertext | HMAC-SHA256 (32)
//! ```
//!
//! The HMAC covers every preceding byte and is checked in constant time
//! before anything is decrypted. Tokens interoperate with other Fernet
//! implementations given the same key.

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, ZencryptError};

type HmacSha256 = Hmac<Sha256>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

const VERSION: u8 = 0x80;
const KEY_LENGTH: usize = 32;
const HALF_KEY: usize = 16;
const TIMESTAMP_LENGTH: usize = 8;
const IV_LENGTH: usize = 16;
const HMAC_LENGTH: usize = 32;
const BLOCK_SIZE: usize = 16;
const HEADER_LENGTH: usize = 1 + TIMESTAMP_LENGTH + IV_LENGTH;

/// Tokens stamped further than this into the future are rejected when a TTL is checked.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// A Fernet key: 16-byte signing key followed by 16-byte encryption key.
///
/// Exchanged as 44 characters of URL-safe base64. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct FernetKey {
    bytes: [u8; KEY_LENGTH],
}

impl FernetKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self {
            bytes: super::random_bytes(),
        }
    }

    /// Build a key from its 32 raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse the URL-safe base64 text form. Surrounding whitespace is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let mut decoded = URL_SAFE
            .decode(encoded.trim())
            .map_err(|e| ZencryptError::InvalidKey(format!("Key is not URL-safe base64: {}", e)))?;
        if decoded.len() != KEY_LENGTH {
            let len = decoded.len();
            decoded.zeroize();
            return Err(ZencryptError::InvalidKey(format!(
                "Fernet key must be {} bytes (got {})",
                KEY_LENGTH, len
            )));
        }
        let mut bytes = [0u8; KEY_LENGTH];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Encode as URL-safe base64 text.
    ///
    /// Avoid logging this value.
    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(self.bytes)
    }

    fn signing_key(&self) -> &[u8] {
        &self.bytes[..HALF_KEY]
    }

    fn encryption_key(&self) -> &[u8] {
        &self.bytes[HALF_KEY..]
    }
}

impl std::fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FernetKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Symmetric cipher bound to one key.
///
/// Built once at start-up (from the key file or the store) and passed to each
/// operation explicitly.
#[derive(Debug, Clone)]
pub struct Fernet {
    key: FernetKey,
}

impl Fernet {
    /// Create a cipher for the given key.
    pub fn new(key: FernetKey) -> Self {
        Self { key }
    }

    /// The key this cipher was built with.
    pub fn key(&self) -> &FernetKey {
        &self.key
    }

    /// Encrypt bytes into a token stamped with the current time.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let iv: [u8; IV_LENGTH] = super::random_bytes();
        self.encrypt_with_parts(plaintext, current_time()?, &iv)
    }

    /// Encrypt UTF-8 text into a token.
    pub fn encrypt_text(&self, text: &str) -> Result<String> {
        self.encrypt(text.as_bytes())
    }

    /// Verify and decrypt a token without an age limit.
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>> {
        self.decrypt_checked(token, None)
    }

    /// Verify and decrypt a token, rejecting it if older than `ttl_secs`
    /// or stamped too far in the future.
    pub fn decrypt_with_ttl(&self, token: &str, ttl_secs: u64) -> Result<Vec<u8>> {
        self.decrypt_checked(token, Some((ttl_secs, current_time()?)))
    }

    /// Decrypt a token whose plaintext must be UTF-8 text.
    pub fn decrypt_text(&self, token: &str) -> Result<String> {
        let plaintext = self.decrypt(token)?;
        String::from_utf8(plaintext).map_err(|_| ZencryptError::InvalidToken)
    }

    /// Read the creation timestamp of an authenticated token.
    pub fn extract_timestamp(&self, token: &str) -> Result<u64> {
        let data = decode_token(token)?;
        self.verify_signature(&data)?;
        Ok(read_timestamp(&data))
    }

    fn encrypt_with_parts(
        &self,
        plaintext: &[u8],
        timestamp: u64,
        iv: &[u8; IV_LENGTH],
    ) -> Result<String> {
        let ciphertext = Aes128CbcEnc::new_from_slices(self.key.encryption_key(), iv)
            .map_err(|e| ZencryptError::Crypto(format!("Cipher init failed: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut data = Vec::with_capacity(HEADER_LENGTH + ciphertext.len() + HMAC_LENGTH);
        data.push(VERSION);
        data.extend_from_slice(&timestamp.to_be_bytes());
        data.extend_from_slice(iv);
        data.extend_from_slice(&ciphertext);

        let mut mac = self.mac()?;
        mac.update(&data);
        data.extend_from_slice(&mac.finalize().into_bytes());

        Ok(URL_SAFE.encode(data))
    }

    fn decrypt_checked(&self, token: &str, time_info: Option<(u64, u64)>) -> Result<Vec<u8>> {
        let data = decode_token(token)?;
        self.verify_signature(&data)?;

        if let Some((ttl, now)) = time_info {
            let timestamp = read_timestamp(&data);
            if timestamp.saturating_add(ttl) < now {
                tracing::debug!(timestamp, ttl, "fernet token expired");
                return Err(ZencryptError::InvalidToken);
            }
            if now.saturating_add(MAX_CLOCK_SKEW_SECS) < timestamp {
                tracing::debug!(timestamp, "fernet token from the future");
                return Err(ZencryptError::InvalidToken);
            }
        }

        let iv = &data[1 + TIMESTAMP_LENGTH..HEADER_LENGTH];
        let ciphertext = &data[HEADER_LENGTH..data.len() - HMAC_LENGTH];
        Aes128CbcDec::new_from_slices(self.key.encryption_key(), iv)
            .map_err(|e| ZencryptError::Crypto(format!("Cipher init failed: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| ZencryptError::InvalidToken)
    }

    fn verify_signature(&self, data: &[u8]) -> Result<()> {
        let (signed, tag) = data.split_at(data.len() - HMAC_LENGTH);
        let mut mac = self.mac()?;
        mac.update(signed);
        mac.verify_slice(tag).map_err(|_| ZencryptError::InvalidToken)
    }

    fn mac(&self) -> Result<HmacSha256> {
        <HmacSha256 as Mac>::new_from_slice(self.key.signing_key())
            .map_err(|e| ZencryptError::Crypto(format!("HMAC init failed: {}", e)))
    }
}

/// Decode a token and check its framing (version byte, minimum length, block alignment).
fn decode_token(token: &str) -> Result<Vec<u8>> {
    let data = URL_SAFE
        .decode(token.trim())
        .map_err(|_| ZencryptError::InvalidToken)?;
    if data.len() < HEADER_LENGTH + BLOCK_SIZE + HMAC_LENGTH {
        return Err(ZencryptError::InvalidToken);
    }
    if data[0] != VERSION {
        return Err(ZencryptError::InvalidToken);
    }
    if (data.len() - HEADER_LENGTH - HMAC_LENGTH) % BLOCK_SIZE != 0 {
        return Err(ZencryptError::InvalidToken);
    }
    Ok(data)
}

fn read_timestamp(data: &[u8]) -> u64 {
    let mut raw = [0u8; TIMESTAMP_LENGTH];
    raw.copy_from_slice(&data[1..1 + TIMESTAMP_LENGTH]);
    u64::from_be_bytes(raw)
}

fn current_time() -> Result<u64> {
    u64::try_from(Utc::now().timestamp())
        .map_err(|_| ZencryptError::Crypto("System clock is before the Unix epoch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Published Fernet "generate" vector.
    const VECTOR_SECRET: &str = "cw_0x689RpI-jtRR7oE8h_eQsKImvJapLeSbXpwF4e4=";
    const VECTOR_TOKEN: &str = "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODy021cpGVWKZ_eEwCGM4BLLF_5CV9dOPmrhuVUPgJobwOz7JcbmrR64jVmpU4IwqDA==";
    const VECTOR_TIMESTAMP: u64 = 499_162_800;

    fn vector_iv() -> [u8; IV_LENGTH] {
        let mut iv = [0u8; IV_LENGTH];
        for (i, byte) in iv.iter_mut().enumerate() {
            *byte = i as u8;
        }
        iv
    }

    #[test]
    fn test_known_vector_encrypts() {
        let fernet = Fernet::new(FernetKey::from_base64(VECTOR_SECRET).unwrap());
        let token = fernet
            .encrypt_with_parts(b"hello", VECTOR_TIMESTAMP, &vector_iv())
            .unwrap();
        assert_eq!(token, VECTOR_TOKEN);
    }

    #[test]
    fn test_known_vector_decrypts() {
        let fernet = Fernet::new(FernetKey::from_base64(VECTOR_SECRET).unwrap());
        assert_eq!(fernet.decrypt_text(VECTOR_TOKEN).unwrap(), "hello");
        assert_eq!(
            fernet.extract_timestamp(VECTOR_TOKEN).unwrap(),
            VECTOR_TIMESTAMP
        );
    }

    #[test]
    fn test_known_vector_expired_with_ttl() {
        let fernet = Fernet::new(FernetKey::from_base64(VECTOR_SECRET).unwrap());
        let result = fernet.decrypt_with_ttl(VECTOR_TOKEN, 60);
        assert!(matches!(result, Err(ZencryptError::InvalidToken)));
    }

    #[test]
    fn test_round_trip() {
        let fernet = Fernet::new(FernetKey::generate());
        let token = fernet.encrypt_text("test").unwrap();
        assert_eq!(fernet.decrypt_text(&token).unwrap(), "test");
    }

    #[test]
    fn test_round_trip_empty_and_block_aligned() {
        let fernet = Fernet::new(FernetKey::generate());
        for plaintext in [&b""[..], &[0x41u8; 16][..], &[0x42u8; 33][..]] {
            let token = fernet.encrypt(plaintext).unwrap();
            assert_eq!(fernet.decrypt(&token).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_fresh_token_passes_ttl() {
        let fernet = Fernet::new(FernetKey::generate());
        let token = fernet.encrypt_text("fresh").unwrap();
        assert_eq!(fernet.decrypt_with_ttl(&token, 60).unwrap(), b"fresh");
    }

    #[test]
    fn test_future_token_rejected_with_ttl() {
        let fernet = Fernet::new(FernetKey::generate());
        let future = current_time().unwrap() + 3600;
        let token = fernet
            .encrypt_with_parts(b"later", future, &vector_iv())
            .unwrap();
        assert!(fernet.decrypt(&token).is_ok());
        assert!(matches!(
            fernet.decrypt_with_ttl(&token, 60),
            Err(ZencryptError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let token = Fernet::new(FernetKey::generate())
            .encrypt_text("test")
            .unwrap();
        let other = Fernet::new(FernetKey::generate());

        let result = other.decrypt_text(&token);
        assert!(matches!(result, Err(ZencryptError::InvalidToken)));
    }

    #[test]
    fn test_every_byte_flip_rejected() {
        let fernet = Fernet::new(FernetKey::generate());
        let token = fernet.encrypt_text("integrity").unwrap();
        let raw = URL_SAFE.decode(&token).unwrap();

        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let result = fernet.decrypt(&URL_SAFE.encode(&tampered));
            assert!(
                matches!(result, Err(ZencryptError::InvalidToken)),
                "flip at byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let fernet = Fernet::new(FernetKey::generate());
        for token in ["", "not base64 at all!", "gAAAAA==", "AAAA"] {
            assert!(matches!(
                fernet.decrypt(token),
                Err(ZencryptError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_token_starts_with_version() {
        let fernet = Fernet::new(FernetKey::generate());
        let token = fernet.encrypt_text("v").unwrap();
        let raw = URL_SAFE.decode(&token).unwrap();
        assert_eq!(raw[0], VERSION);
        assert!(token.starts_with("gAAAAA"));
    }

    #[test]
    fn test_non_utf8_plaintext_is_invalid_text() {
        let fernet = Fernet::new(FernetKey::generate());
        let token = fernet.encrypt(&[0xff, 0xfe]).unwrap();
        assert!(matches!(
            fernet.decrypt_text(&token),
            Err(ZencryptError::InvalidToken)
        ));
    }

    #[test]
    fn test_key_base64_round_trip() {
        let key = FernetKey::generate();
        let encoded = key.to_base64();
        assert_eq!(encoded.len(), 44);
        assert_eq!(FernetKey::from_base64(&format!("{}\n", encoded)).unwrap(), key);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(FernetKey::from_base64("short").is_err());
        assert!(FernetKey::from_base64(&URL_SAFE.encode([0u8; 16])).is_err());
    }

    #[test]
    fn test_key_debug_redacts() {
        let key = FernetKey::generate();
        let debug_output = format!("{:?}", Fernet::new(key.clone()));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains(&key.to_base64()));
    }
}
