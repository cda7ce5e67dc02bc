//! Anonymous access protocol.
//!
//! An anonymous recipient holds only a share link: the `accessId` and the
//! fragment key bytes. The Send's gate is unknown until first contact, so
//! access is a small state machine:
//!
//! ```text
//! Unauthenticated ──open──► Authenticated ──decrypt──► Decrypted
//!        │                        ▲
//!        └──► AwaitingAuth ──proof┘          (any step may end in Denied)
//! ```
//!
//! The machine holds no cross-request state; every access attempt is a fresh
//! instance and can be abandoned at any state without side effects. Proofs
//! are derived at submission time, never cached across attempts.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crypto::{decrypt_file, derive_password_proof, derive_send_key};
use crate::envelope::{SendFile, SendText, SendType};
use crate::error::{Result, SendError};
use crate::link::ShareLink;

/// Body of `POST /api/sends/access/{access_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAccessRequest {
    /// Password proof (base64url), present only for password-gated Sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// One-time token, present only for email-gated Sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// The restricted, anonymous-facing projection of a Send.
///
/// A read model only: the recipient never mutates it. An absent
/// `creator_identifier` means the creator is hidden or unknown; the wire does
/// not distinguish the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAccess {
    pub id: String,
    #[serde(rename = "type")]
    pub send_type: SendType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub text: Option<SendText>,
    #[serde(default)]
    pub file: Option<SendFile>,
    /// Wrapped key as stored server-side. Useless to the anonymous caller,
    /// who derives the content key from the link fragment instead.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_identifier: Option<String>,
}

/// Typed outcome of one access call, produced by the transport from the raw
/// HTTP response.
#[derive(Debug, Clone)]
pub enum AccessReply {
    /// 2xx with a `SendAccess` body.
    Granted(SendAccess),
    /// 401: a gate must be satisfied (or an authenticated session expired).
    AuthRequired,
    /// 400 with a server-supplied message (wrong proof, rate limit).
    Rejected(String),
    /// 404: never existed, deleted, expired, disabled, or access-exhausted.
    Missing,
}

/// Transport seam for the access endpoint. Production impl lives in
/// [`crate::api::SendApiClient`]; tests substitute a mock.
#[async_trait]
pub trait AccessTransport: Send + Sync {
    async fn request_access(
        &self,
        access_id: &str,
        request: &SendAccessRequest,
    ) -> Result<AccessReply>;
}

/// Client-side position in the access protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unauthenticated,
    AwaitingAuth,
    Authenticated,
    Decrypted,
    Denied,
}

/// Non-terminal outcome of an access step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessProgress {
    /// The restricted envelope arrived; content may now be decrypted.
    Authenticated,
    /// A proof (password or OTP) is required before access is granted.
    AwaitingAuth,
    /// An authenticated session expired; the walk restarts from scratch.
    Expired,
}

/// Decrypted content as delivered to the recipient.
#[derive(Debug, Clone)]
pub struct SendContent {
    pub send_type: SendType,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub text: Option<String>,
    pub text_hidden: bool,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub file_id: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub creator_identifier: Option<String>,
}

/// Drives one anonymous access attempt for one share link.
pub struct AccessProtocolClient<T> {
    transport: T,
    link: ShareLink,
    state: AccessState,
    access: Option<SendAccess>,
}

impl<T: AccessTransport> AccessProtocolClient<T> {
    pub fn new(transport: T, link: ShareLink) -> Self {
        Self {
            transport,
            link,
            state: AccessState::Unauthenticated,
            access: None,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    /// The restricted envelope, once authenticated.
    pub fn send_access(&self) -> Option<&SendAccess> {
        self.access.as_ref()
    }

    /// First contact: fetch without any proof.
    ///
    /// A gate-free Send is granted immediately; a gated Send answers
    /// `AwaitingAuth` and the caller supplies a proof next.
    pub async fn open(&mut self) -> Result<AccessProgress> {
        self.ensure_not_denied()?;
        let reply = self
            .transport
            .request_access(&self.link.access_id, &SendAccessRequest::default())
            .await?;
        self.apply(reply)
    }

    /// Submit a password proof for a password-gated Send.
    ///
    /// The proof is derived fresh from the fragment bytes on every call, so
    /// a resumed attempt never resubmits stale bytes.
    pub async fn submit_password(&mut self, password: &str) -> Result<AccessProgress> {
        self.ensure_not_denied()?;
        let proof = derive_password_proof(password, self.link.fragment_key());
        let request = SendAccessRequest {
            password: Some(URL_SAFE_NO_PAD.encode(proof)),
            otp: None,
        };
        let reply = self
            .transport
            .request_access(&self.link.access_id, &request)
            .await?;
        self.apply(reply)
    }

    /// Submit an out-of-band one-time token for an email-gated Send.
    ///
    /// A missing token is not an error: the caller is signaled back into
    /// `AwaitingAuth` to go acquire one, with no network call made.
    pub async fn submit_otp(&mut self, token: &str) -> Result<AccessProgress> {
        self.ensure_not_denied()?;
        if token.trim().is_empty() {
            self.state = AccessState::AwaitingAuth;
            return Ok(AccessProgress::AwaitingAuth);
        }
        let request = SendAccessRequest {
            password: None,
            otp: Some(token.trim().to_string()),
        };
        let reply = self
            .transport
            .request_access(&self.link.access_id, &request)
            .await?;
        self.apply(reply)
    }

    /// `Denied` is terminal for this attempt: no further requests leave this
    /// instance, so a denied walk can never be retried into a grant. A new
    /// attempt needs a fresh client.
    fn ensure_not_denied(&self) -> Result<()> {
        if self.state == AccessState::Denied {
            return Err(SendError::AuthDenied("attempt already denied".to_string()));
        }
        Ok(())
    }

    fn apply(&mut self, reply: AccessReply) -> Result<AccessProgress> {
        match reply {
            AccessReply::Granted(access) => {
                debug!(access_id = %self.link.access_id, "access granted");
                self.access = Some(access);
                self.state = AccessState::Authenticated;
                Ok(AccessProgress::Authenticated)
            }
            AccessReply::AuthRequired => {
                if matches!(
                    self.state,
                    AccessState::Authenticated | AccessState::Decrypted
                ) {
                    // The link/session expired mid-walk; everything derived
                    // so far is stale.
                    debug!(access_id = %self.link.access_id, "session expired, restarting");
                    self.access = None;
                    self.state = AccessState::Unauthenticated;
                    Ok(AccessProgress::Expired)
                } else {
                    self.state = AccessState::AwaitingAuth;
                    Ok(AccessProgress::AwaitingAuth)
                }
            }
            AccessReply::Rejected(message) => {
                warn!(access_id = %self.link.access_id, %message, "access rejected");
                self.state = AccessState::Denied;
                Err(SendError::AuthDenied(message))
            }
            AccessReply::Missing => {
                // Wrong password and never-existed collapse into the same
                // caller-visible outcome; only this log knows which request
                // it was.
                warn!(access_id = %self.link.access_id, "send not found or exhausted");
                self.state = AccessState::Denied;
                Err(SendError::NotFound("access endpoint returned 404".to_string()))
            }
        }
    }

    /// Decrypt the authenticated envelope's fields.
    ///
    /// Only here is the content key derived; a walk that ends in `Denied`
    /// never touches key material. Text content is decrypted inline; file
    /// blobs are downloaded by the caller and opened with
    /// [`decrypt_file_blob`](Self::decrypt_file_blob).
    pub fn decrypt_content(&mut self) -> Result<SendContent> {
        let access = match (&self.state, &self.access) {
            (AccessState::Authenticated | AccessState::Decrypted, Some(access)) => access,
            _ => {
                return Err(SendError::InvalidInput(
                    "Content is only available after authentication".to_string(),
                ))
            }
        };

        let content_key = derive_send_key(self.link.fragment_key())?;

        let name = match access.name.as_deref() {
            Some(c) => Some(crate::crypto::decrypt_text(c, &content_key)?),
            None => None,
        };
        let notes = match access.notes.as_deref() {
            Some(c) => Some(crate::crypto::decrypt_text(c, &content_key)?),
            None => None,
        };

        let (text, text_hidden) = match &access.text {
            Some(t) => (
                match t.text.as_deref() {
                    Some(c) => Some(crate::crypto::decrypt_text(c, &content_key)?),
                    None => None,
                },
                t.hidden,
            ),
            None => (None, false),
        };

        let (file_name, file_size, file_id) = match &access.file {
            Some(f) => (
                match f.file_name.as_deref() {
                    Some(c) => Some(crate::crypto::decrypt_text(c, &content_key)?),
                    None => None,
                },
                f.size,
                f.id.clone(),
            ),
            None => (None, None, None),
        };

        let content = SendContent {
            send_type: access.send_type,
            name,
            notes,
            text,
            text_hidden,
            file_name,
            file_size,
            file_id,
            expiration_date: access.expiration_date,
            creator_identifier: access.creator_identifier.clone(),
        };
        self.state = AccessState::Decrypted;
        Ok(content)
    }

    /// Open a downloaded file blob under this link's content key.
    pub fn decrypt_file_blob(&self, blob: &[u8]) -> Result<Vec<u8>> {
        if !matches!(
            self.state,
            AccessState::Authenticated | AccessState::Decrypted
        ) {
            return Err(SendError::InvalidInput(
                "Content is only available after authentication".to_string(),
            ));
        }
        let content_key = derive_send_key(self.link.fragment_key())?;
        decrypt_file(blob, &content_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_before_auth_rejected() {
        struct NoTransport;
        #[async_trait]
        impl AccessTransport for NoTransport {
            async fn request_access(
                &self,
                _access_id: &str,
                _request: &SendAccessRequest,
            ) -> Result<AccessReply> {
                unreachable!("no network call expected")
            }
        }

        let link = ShareLink::new("abc", vec![0u8; 16]);
        let mut client = AccessProtocolClient::new(NoTransport, link);
        assert_eq!(client.state(), AccessState::Unauthenticated);
        assert!(client.decrypt_content().is_err());
        assert!(client.decrypt_file_blob(&[0u8; 32]).is_err());
    }

    #[tokio::test]
    async fn test_blank_otp_reenters_awaiting_auth() {
        struct NoTransport;
        #[async_trait]
        impl AccessTransport for NoTransport {
            async fn request_access(
                &self,
                _access_id: &str,
                _request: &SendAccessRequest,
            ) -> Result<AccessReply> {
                unreachable!("blank token must not reach the network")
            }
        }

        let link = ShareLink::new("abc", vec![0u8; 16]);
        let mut client = AccessProtocolClient::new(NoTransport, link);
        let progress = client.submit_otp("  ").await.unwrap();
        assert_eq!(progress, AccessProgress::AwaitingAuth);
        assert_eq!(client.state(), AccessState::AwaitingAuth);
    }

    #[test]
    fn test_access_request_omits_absent_fields() {
        let body = serde_json::to_value(SendAccessRequest::default()).unwrap();
        assert_eq!(body, serde_json::json!({}));
    }
}
