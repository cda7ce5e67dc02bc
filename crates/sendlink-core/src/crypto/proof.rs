//! Password proof derivation for password-gated Sends.
//!
//! The server never learns the fragment key or the content key. What it
//! verifies is a PBKDF2 digest of the password, salted with the fragment key
//! bytes: anyone holding the link can produce the proof, but the proof
//! reveals nothing about the content key.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// PBKDF2 iteration count for password proofs. Protocol constant, not
/// user-configurable.
pub const PASSWORD_PROOF_ITERATIONS: u32 = 100_000;

/// Length of a password proof in bytes.
pub const PROOF_LENGTH: usize = 32;

/// Derive the password proof submitted to the server for a password-gated
/// Send.
///
/// # Arguments
///
/// * `password` - The plaintext password entered by the recipient
/// * `fragment` - The raw key bytes from the share link, used as salt
///
/// Deterministic: the same password and link always produce the same proof,
/// so a proof may be safely resubmitted after a transport failure.
pub fn derive_password_proof(password: &str, fragment: &[u8]) -> [u8; PROOF_LENGTH] {
    let mut out = [0u8; PROOF_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        fragment,
        PASSWORD_PROOF_ITERATIONS,
        &mut out,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &[u8] = &[0xAB; 16];

    #[test]
    fn test_proof_deterministic() {
        let a = derive_password_proof("hunter2", FRAGMENT);
        let b = derive_password_proof("hunter2", FRAGMENT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_proof_depends_on_password_and_salt() {
        let base = derive_password_proof("hunter2", FRAGMENT);
        assert_ne!(base, derive_password_proof("hunter3", FRAGMENT));
        assert_ne!(base, derive_password_proof("hunter2", &[0xCD; 16]));
    }

    #[test]
    fn test_proof_has_fixed_length() {
        let proof = derive_password_proof("hunter2", FRAGMENT);
        assert_eq!(proof.len(), PROOF_LENGTH);
    }
}
