//! # Sendlink Core
//!
//! Core library for Sendlink - ephemeral, end-to-end encrypted secret sharing.
//!
//! This crate provides the domain logic: envelope encryption, share-link
//! handling, the anonymous access protocol, and the HTTP API client,
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **auth**: Auth-gate resolution (none / password / email-OTP)
//! - **crypto**: Content-key derivation, password proofs, AEAD sealing
//! - **link**: Share-link parsing and formatting
//! - **envelope**: Wire model plus seal/open for owner-side Sends
//! - **access**: Anonymous access state machine
//! - **api**: HTTP client for owner and anonymous endpoints
//!
//! The server only ever sees ciphertext, wrapped keys, and derived proofs;
//! the fragment key that unlocks a Send travels exclusively in the share
//! link's URL fragment.

pub mod access;
pub mod api;
pub mod auth;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod link;

pub use access::{AccessProgress, AccessProtocolClient, AccessState, AccessTransport};
pub use api::SendApiClient;
pub use auth::{AuthGate, AuthType};
pub use envelope::{SendDraft, SendEnvelope, SendType, SendUpsert, SendView};
pub use error::{Result, SendError, CONFLICTING_GATES_MSG, SEND_INACCESSIBLE_MSG};
pub use link::ShareLink;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
