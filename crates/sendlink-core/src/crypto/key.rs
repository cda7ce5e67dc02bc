//! Symmetric key material and send-key derivation.
//!
//! A Send's content key is never stored or transmitted directly. It is
//! derived on demand from the raw key bytes carried in the share link's URL
//! fragment, via HKDF-SHA256. The same fragment bytes always derive the same
//! content key, on the owner side and the anonymous side alike.

use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, SendError};

/// Length of the raw key bytes embedded in a share link's fragment.
pub const FRAGMENT_KEY_LENGTH: usize = 16;

/// Length of a derived symmetric key in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// HKDF info string for content-key derivation. Protocol constant.
const SEND_KEY_INFO: &[u8] = b"send";

/// A 256-bit symmetric key.
///
/// Used both for Send content keys (derived from fragment bytes) and for the
/// owner's account key. Key material is zeroized from memory on drop.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; KEY_LENGTH],
}

impl SymmetricKey {
    /// Create a key from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure
    /// source (a KDF output or a CSPRNG).
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Parse a key from a slice, rejecting wrong lengths.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| SendError::Crypto(format!("Key must be {} bytes", KEY_LENGTH)))?;
        Ok(Self { key })
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate the raw fragment key bytes for a new share link.
pub fn generate_fragment_key() -> Vec<u8> {
    let mut bytes = vec![0u8; FRAGMENT_KEY_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Derive a Send's content key from the share link's fragment bytes.
///
/// Pure transform: same fragment bytes always yield the same key. The
/// fragment itself never leaves the client; only ciphertext produced under
/// the derived key does.
///
/// # Errors
///
/// Returns `SendError::Crypto` if the fragment is shorter than
/// [`FRAGMENT_KEY_LENGTH`].
pub fn derive_send_key(fragment: &[u8]) -> Result<SymmetricKey> {
    if fragment.len() < FRAGMENT_KEY_LENGTH {
        return Err(SendError::Crypto(format!(
            "Fragment key must be at least {} bytes (got {})",
            FRAGMENT_KEY_LENGTH,
            fragment.len()
        )));
    }

    let hk = Hkdf::<Sha256>::new(None, fragment);
    let mut okm = [0u8; KEY_LENGTH];
    hk.expand(SEND_KEY_INFO, &mut okm)
        .map_err(|e| SendError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(SymmetricKey::from_bytes(okm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_deterministic() {
        let fragment = [7u8; FRAGMENT_KEY_LENGTH];
        let key1 = derive_send_key(&fragment).unwrap();
        let key2 = derive_send_key(&fragment).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_fragment_different_key() {
        let key1 = derive_send_key(&[1u8; FRAGMENT_KEY_LENGTH]).unwrap();
        let key2 = derive_send_key(&[2u8; FRAGMENT_KEY_LENGTH]).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_short_fragment_rejected() {
        let result = derive_send_key(&[0u8; 8]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 16 bytes"));
    }

    #[test]
    fn test_generated_fragments_are_unique() {
        let a = generate_fragment_key();
        let b = generate_fragment_key();
        assert_eq!(a.len(), FRAGMENT_KEY_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_debug_redacts() {
        let key = derive_send_key(&[3u8; FRAGMENT_KEY_LENGTH]).unwrap();
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));
        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
