//! Error types for Send operations.
//!
//! This module defines the error hierarchy for the whole core. Errors are
//! descriptive at the core level; the CLI layer maps them to user-facing
//! messages and exit codes.
//!
//! `AuthDenied` and `NotFound` deliberately share one display message: at the
//! anonymous access boundary, "wrong password" and "never existed" must be
//! indistinguishable to avoid existence enumeration. The variants stay
//! separate so internal logging can tell them apart.

use thiserror::Error;

/// The non-enumerating message shown for any inaccessible Send.
pub const SEND_INACCESSIBLE_MSG: &str = "Send does not exist or is no longer available";

/// The exact conflict message for mutually exclusive auth gates.
pub const CONFLICTING_GATES_MSG: &str = "--password and --emails are mutually exclusive.";

/// Result type alias for Send operations.
pub type Result<T> = std::result::Result<T, SendError>;

/// Core error type for Send operations.
#[derive(Debug, Error)]
pub enum SendError {
    /// Both a password and an email list were supplied for one Send.
    #[error("{CONFLICTING_GATES_MSG}")]
    ConflictingAuthGates,

    /// An edit tried to change a Send's type (text vs. file).
    #[error("Sends can't change type")]
    TypeImmutable,

    /// An edit request did not carry the id of the Send to modify.
    #[error("Missing id: an edit must name an existing Send")]
    MissingId,

    /// The share link could not be parsed (bad shape or invalid base64url key).
    #[error("Malformed share link: {0}")]
    MalformedShareLink(String),

    /// Invalid caller input outside the dedicated variants above.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrong or missing password/OTP proof. Displays as "unavailable".
    #[error("{SEND_INACCESSIBLE_MSG}")]
    AuthDenied(String),

    /// Send never existed, was deleted, expired, or is access-exhausted.
    /// Displays as "unavailable", same as `AuthDenied`.
    #[error("{SEND_INACCESSIBLE_MSG}")]
    NotFound(String),

    /// Ciphertext/key mismatch after authentication. Non-retryable.
    #[error("Decryption failed: ciphertext does not match the key")]
    DecryptionFailed,

    /// Encryption or key-derivation error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Network or server failure, propagated opaquely.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SendError {
    /// Internal detail for logging; never shown to anonymous callers.
    pub fn internal_detail(&self) -> Option<&str> {
        match self {
            SendError::AuthDenied(detail) | SendError::NotFound(detail) => Some(detail),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SendError {
    fn from(err: serde_json::Error) -> Self {
        SendError::InvalidInput(err.to_string())
    }
}

impl From<reqwest::Error> for SendError {
    fn from(err: reqwest::Error) -> Self {
        SendError::Transport(err.to_string())
    }
}
