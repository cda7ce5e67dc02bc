//! Cryptographic operations for Send.
//!
//! This module covers the three primitive surfaces the protocol consumes:
//! - **key**: HKDF-SHA256 content-key derivation from share-link fragment bytes
//! - **proof**: fixed-iteration PBKDF2 password proofs for password-gated Sends
//! - **cipher**: AES-256-GCM sealing of Send fields and payloads
//!
//! ## Security Model
//!
//! - The fragment key travels only inside the share link, never to the server
//! - The server verifies a PBKDF2 proof salted with the fragment key; it can
//!   never recover the content key from it
//! - Key material is zeroized from memory on drop
//!
//! We do NOT defend against a compromised recipient device or a leaked link.

pub mod cipher;
pub mod key;
pub mod proof;

pub use cipher::{decrypt_bytes, decrypt_file, decrypt_text, encrypt_bytes, encrypt_string};
pub use key::{derive_send_key, generate_fragment_key, SymmetricKey, FRAGMENT_KEY_LENGTH};
pub use proof::{derive_password_proof, PASSWORD_PROOF_ITERATIONS};
