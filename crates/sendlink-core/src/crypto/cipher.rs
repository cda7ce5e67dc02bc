//! Authenticated encryption for Send payloads.
//!
//! All Send fields are sealed with AES-256-GCM under the content key. The
//! random 96-bit nonce is prepended to the ciphertext, so a sealed blob is
//! self-contained: `nonce || ciphertext || tag`.
//!
//! A failed open means either a corrupted blob or a key mismatch. Both are
//! non-transient, so callers must surface `DecryptionFailed` and never retry.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::key::SymmetricKey;
use crate::error::{Result, SendError};

/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LENGTH: usize = 12;

/// Seal raw bytes under a symmetric key.
///
/// Each call draws a fresh nonce; sealing the same plaintext twice never
/// yields the same blob.
pub fn encrypt_bytes(plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| SendError::Crypto("Encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a sealed blob.
///
/// # Errors
///
/// Returns `SendError::DecryptionFailed` if the blob is truncated, the
/// authentication tag does not verify, or the key does not match.
pub fn decrypt_bytes(blob: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LENGTH {
        return Err(SendError::DecryptionFailed);
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LENGTH);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SendError::DecryptionFailed)
}

/// Seal a UTF-8 string, returning the blob as base64.
///
/// This is the wire form of every encrypted string field (`name`, `notes`,
/// text payload).
pub fn encrypt_string(plaintext: &str, key: &SymmetricKey) -> Result<String> {
    let blob = encrypt_bytes(plaintext.as_bytes(), key)?;
    Ok(STANDARD.encode(blob))
}

/// Open a base64-encoded string field back to plaintext.
pub fn decrypt_text(ciphertext_b64: &str, key: &SymmetricKey) -> Result<String> {
    let blob = STANDARD
        .decode(ciphertext_b64)
        .map_err(|_| SendError::DecryptionFailed)?;
    let plaintext = decrypt_bytes(&blob, key)?;
    String::from_utf8(plaintext).map_err(|_| SendError::DecryptionFailed)
}

/// Open a downloaded file blob.
pub fn decrypt_file(blob: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    decrypt_bytes(blob, key)
}
