//! The Send envelope: wire model plus encode/decode.
//!
//! A Send's `name`, `notes`, and payload travel and rest as ciphertext under
//! the content key. The content key itself is never stored: the envelope's
//! `key` field holds the link fragment bytes wrapped under the owner's
//! account key, and the distributed share link carries the same bytes in its
//! URL fragment. Either party re-derives the content key locally.
//!
//! Optional fields are genuinely optional at the protocol level: a `null`
//! name decrypts to `None` without the cipher ever being invoked.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{join_emails, split_emails, AuthGate, AuthType};
use crate::crypto::{
    decrypt_text, derive_password_proof, derive_send_key, encrypt_bytes, encrypt_string,
    generate_fragment_key, SymmetricKey,
};
use crate::error::{Result, SendError};

/// Send payload kind. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SendType {
    Text,
    File,
}

impl From<SendType> for i32 {
    fn from(t: SendType) -> i32 {
        match t {
            SendType::Text => 0,
            SendType::File => 1,
        }
    }
}

impl TryFrom<i32> for SendType {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(SendType::Text),
            1 => Ok(SendType::File),
            other => Err(format!("Invalid Send type: {}", other)),
        }
    }
}

/// Text payload on the wire. `text` is ciphertext when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendText {
    pub text: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

/// File metadata on the wire. `file_name` is ciphertext when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFile {
    #[serde(default)]
    pub id: Option<String>,
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Creation/edit request as sent to the server. All sensitive fields are
/// already ciphertext by the time this struct exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub send_type: SendType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fragment key bytes wrapped under the owner's account key.
    pub key: String,
    /// Password proof (base64url), present only for password-gated Sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Comma-joined email list, present only for email-gated Sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_access_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub deletion_date: DateTime<Utc>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SendText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<SendFile>,
}

/// Owner-facing Send as returned by the server. Everything sensitive is
/// ciphertext until [`SendEnvelope::decrypt`] is called with the account key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEnvelope {
    pub id: String,
    /// Public-facing anonymous lookup id, distinct from `id`.
    pub access_id: String,
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
    pub key: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub emails: Option<String>,
    #[serde(default)]
    pub max_access_count: Option<i32>,
    #[serde(default)]
    pub access_count: i32,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hide_email: Option<bool>,
    pub revision_date: DateTime<Utc>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    pub deletion_date: DateTime<Utc>,
}

/// Decrypted owner view of a Send.
#[derive(Debug, Clone, Serialize)]
pub struct SendView {
    pub id: String,
    pub access_id: String,
    pub send_type: SendType,
    pub auth_type: String,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub text: Option<TextView>,
    pub file: Option<FileView>,
    pub emails: Vec<String>,
    pub max_access_count: Option<i32>,
    pub access_count: i32,
    pub disabled: bool,
    pub hide_email: bool,
    pub revision_date: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub deletion_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextView {
    pub text: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub file_name: Option<String>,
    pub size: Option<u64>,
}

/// Plaintext text payload of a draft.
#[derive(Debug, Clone)]
pub struct TextDraft {
    pub text: String,
    pub hidden: bool,
}

/// Plaintext file metadata of a draft. The blob upload itself is owned by
/// the transport collaborator.
#[derive(Debug, Clone)]
pub struct FileDraft {
    pub file_name: String,
    pub size: u64,
}

/// Plaintext creation/edit input, gate already resolved.
#[derive(Debug, Clone)]
pub struct SendDraft {
    pub send_type: SendType,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub text: Option<TextDraft>,
    pub file: Option<FileDraft>,
    pub gate: AuthGate,
    pub max_access_count: Option<i32>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub deletion_date: DateTime<Utc>,
    pub disabled: bool,
    pub hide_email: bool,
}

/// A sealed draft: the wire request plus the fragment key bytes the share
/// link will carry. The fragment bytes are this component's only output of
/// key material; link assembly happens elsewhere.
#[derive(Debug)]
pub struct SealedSend {
    pub upsert: SendUpsert,
    pub fragment_key: Vec<u8>,
}

impl SendDraft {
    /// Seal this draft for creation: generate fresh fragment bytes, encrypt
    /// every sensitive field under the derived content key, and wrap the
    /// fragment bytes under the owner's account key.
    pub fn seal(&self, account_key: &SymmetricKey) -> Result<SealedSend> {
        let fragment_key = generate_fragment_key();
        let upsert = self.seal_with_fragment(account_key, &fragment_key, None)?;
        Ok(SealedSend {
            upsert,
            fragment_key,
        })
    }

    fn seal_with_fragment(
        &self,
        account_key: &SymmetricKey,
        fragment_key: &[u8],
        id: Option<String>,
    ) -> Result<SendUpsert> {
        if self.text.is_some() && self.send_type != SendType::Text {
            return Err(SendError::InvalidInput(
                "Text payload on a non-text Send".to_string(),
            ));
        }
        if self.file.is_some() && self.send_type != SendType::File {
            return Err(SendError::InvalidInput(
                "File payload on a non-file Send".to_string(),
            ));
        }

        let content_key = derive_send_key(fragment_key)?;

        let name = self
            .name
            .as_deref()
            .map(|n| encrypt_string(n, &content_key))
            .transpose()?;
        let notes = self
            .notes
            .as_deref()
            .map(|n| encrypt_string(n, &content_key))
            .transpose()?;

        let text = match (&self.send_type, &self.text) {
            (SendType::Text, Some(draft)) => Some(SendText {
                text: Some(encrypt_string(&draft.text, &content_key)?),
                hidden: draft.hidden,
            }),
            (SendType::Text, None) => {
                return Err(SendError::InvalidInput(
                    "Text Send requires a text payload".to_string(),
                ))
            }
            _ => None,
        };

        let file = match (&self.send_type, &self.file) {
            (SendType::File, Some(draft)) => Some(SendFile {
                id: None,
                file_name: Some(encrypt_string(&draft.file_name, &content_key)?),
                size: Some(draft.size),
            }),
            (SendType::File, None) => {
                return Err(SendError::InvalidInput(
                    "File Send requires file metadata".to_string(),
                ))
            }
            _ => None,
        };

        let (password, emails) = match &self.gate {
            AuthGate::None => (None, None),
            AuthGate::Password(pw) => {
                let proof = derive_password_proof(pw, fragment_key);
                (Some(URL_SAFE_NO_PAD.encode(proof)), None)
            }
            AuthGate::Email(list) => (None, Some(join_emails(list))),
        };

        let wrapped_key = encrypt_bytes(fragment_key, account_key)?;

        Ok(SendUpsert {
            id,
            send_type: self.send_type,
            name,
            notes,
            key: STANDARD.encode(wrapped_key),
            password,
            emails,
            max_access_count: self.max_access_count,
            expiration_date: self.expiration_date,
            deletion_date: self.deletion_date,
            disabled: self.disabled,
            hide_email: if self.hide_email { Some(true) } else { None },
            text,
            file,
        })
    }
}

impl SendEnvelope {
    /// The gate currently protecting this Send, inferred from the wire.
    pub fn auth_type(&self) -> AuthType {
        if self.password.is_some() {
            AuthType::Password
        } else if !split_emails(self.emails.as_deref()).is_empty() {
            AuthType::Email
        } else {
            AuthType::None
        }
    }

    /// Unwrap the envelope's `key` field back to the raw fragment bytes.
    pub fn unwrap_fragment_key(&self, account_key: &SymmetricKey) -> Result<Vec<u8>> {
        let wrapped = STANDARD
            .decode(&self.key)
            .map_err(|_| SendError::DecryptionFailed)?;
        crate::crypto::decrypt_bytes(&wrapped, account_key)
    }

    /// Decrypt the owner view with the account key.
    ///
    /// Absent ciphertext decrypts to `None`; the cipher is only invoked for
    /// fields that are present.
    pub fn decrypt(&self, account_key: &SymmetricKey) -> Result<SendView> {
        let fragment_key = self.unwrap_fragment_key(account_key)?;
        let content_key = derive_send_key(&fragment_key)?;

        let name = decrypt_optional(self.name.as_deref(), &content_key)?;
        let notes = decrypt_optional(self.notes.as_deref(), &content_key)?;

        let text = match &self.text {
            Some(t) => Some(TextView {
                text: decrypt_optional(t.text.as_deref(), &content_key)?,
                hidden: t.hidden,
            }),
            None => None,
        };

        let file = match &self.file {
            Some(f) => Some(FileView {
                file_name: decrypt_optional(f.file_name.as_deref(), &content_key)?,
                size: f.size,
            }),
            None => None,
        };

        Ok(SendView {
            id: self.id.clone(),
            access_id: self.access_id.clone(),
            send_type: self.send_type,
            auth_type: self.auth_type().to_string(),
            name,
            notes,
            text,
            file,
            emails: split_emails(self.emails.as_deref()),
            max_access_count: self.max_access_count,
            access_count: self.access_count,
            disabled: self.disabled,
            hide_email: self.hide_email.unwrap_or(false),
            revision_date: self.revision_date,
            expiration_date: self.expiration_date,
            deletion_date: self.deletion_date,
        })
    }

    /// Seal an edit of this Send.
    ///
    /// The existing envelope must decrypt under the account key first (an
    /// edit is only valid against a Send the caller can actually read), the
    /// type must not change, and the existing fragment bytes are reused so
    /// links already distributed keep working.
    pub fn seal_edit(&self, account_key: &SymmetricKey, draft: &SendDraft) -> Result<SendUpsert> {
        if self.id.trim().is_empty() {
            return Err(SendError::MissingId);
        }
        if draft.send_type != self.send_type {
            return Err(SendError::TypeImmutable);
        }

        // Proves the caller holds the right account key before anything is
        // re-encrypted.
        let _ = self.decrypt(account_key)?;

        let fragment_key = self.unwrap_fragment_key(account_key)?;
        draft.seal_with_fragment(account_key, &fragment_key, Some(self.id.clone()))
    }
}

fn decrypt_optional(ciphertext: Option<&str>, key: &SymmetricKey) -> Result<Option<String>> {
    match ciphertext {
        None => Ok(None),
        Some(c) => decrypt_text(c, key).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_key() -> SymmetricKey {
        SymmetricKey::from_bytes([0x11; 32])
    }

    fn text_draft() -> SendDraft {
        SendDraft {
            send_type: SendType::Text,
            name: Some("my send".to_string()),
            notes: None,
            text: Some(TextDraft {
                text: "the secret".to_string(),
                hidden: false,
            }),
            file: None,
            gate: AuthGate::None,
            max_access_count: Some(5),
            expiration_date: None,
            deletion_date: Utc::now() + chrono::Duration::days(7),
            disabled: false,
            hide_email: false,
        }
    }

    fn envelope_from(upsert: SendUpsert) -> SendEnvelope {
        SendEnvelope {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            access_id: "AbCdEf".to_string(),
            send_type: upsert.send_type,
            name: upsert.name,
            notes: upsert.notes,
            text: upsert.text,
            file: upsert.file,
            key: upsert.key,
            password: upsert.password,
            emails: upsert.emails,
            max_access_count: upsert.max_access_count,
            access_count: 0,
            disabled: upsert.disabled,
            hide_email: upsert.hide_email,
            revision_date: Utc::now(),
            expiration_date: upsert.expiration_date,
            deletion_date: upsert.deletion_date,
        }
    }

    #[test]
    fn test_seal_encrypts_fields() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let name = sealed.upsert.name.as_deref().unwrap();
        assert_ne!(name, "my send");
        let text = sealed.upsert.text.as_ref().unwrap();
        assert_ne!(text.text.as_deref().unwrap(), "the secret");
        assert!(sealed.upsert.password.is_none());
        assert!(sealed.upsert.emails.is_none());
    }

    #[test]
    fn test_seal_decrypt_round_trip() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let view = envelope_from(sealed.upsert).decrypt(&account_key()).unwrap();
        assert_eq!(view.name.as_deref(), Some("my send"));
        assert_eq!(view.notes, None);
        assert_eq!(view.text.unwrap().text.as_deref(), Some("the secret"));
        assert_eq!(view.auth_type, "none");
        assert_eq!(view.max_access_count, Some(5));
    }

    #[test]
    fn test_null_name_stays_null() {
        let mut draft = text_draft();
        draft.name = None;
        let sealed = draft.seal(&account_key()).unwrap();
        assert!(sealed.upsert.name.is_none());
        let view = envelope_from(sealed.upsert).decrypt(&account_key()).unwrap();
        assert_eq!(view.name, None);
    }

    #[test]
    fn test_password_gate_emits_proof_not_password() {
        let mut draft = text_draft();
        draft.gate = AuthGate::Password("hunter2".to_string());
        let sealed = draft.seal(&account_key()).unwrap();
        let wire_password = sealed.upsert.password.unwrap();
        assert_ne!(wire_password, "hunter2");
        assert!(!wire_password.contains("hunter2"));

        let expected = derive_password_proof("hunter2", &sealed.fragment_key);
        assert_eq!(wire_password, URL_SAFE_NO_PAD.encode(expected));
    }

    #[test]
    fn test_email_gate_serializes_comma_joined() {
        let mut draft = text_draft();
        draft.gate = AuthGate::Email(vec!["a@x.com".to_string(), " b@x.com ".to_string()]);
        let sealed = draft.seal(&account_key()).unwrap();
        assert_eq!(sealed.upsert.emails.as_deref(), Some("a@x.com,b@x.com"));

        let view = envelope_from(sealed.upsert).decrypt(&account_key()).unwrap();
        assert_eq!(view.emails, vec!["a@x.com", "b@x.com"]);
        assert_eq!(view.auth_type, "email");
    }

    #[test]
    fn test_wrong_account_key_fails() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let other = SymmetricKey::from_bytes([0x99; 32]);
        let result = envelope_from(sealed.upsert).decrypt(&other);
        assert!(matches!(result, Err(SendError::DecryptionFailed)));
    }

    #[test]
    fn test_edit_rejects_type_change_before_encrypting() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let envelope = envelope_from(sealed.upsert);

        let mut edit = text_draft();
        edit.send_type = SendType::File;
        edit.text = None;
        edit.file = Some(FileDraft {
            file_name: "report.pdf".to_string(),
            size: 1024,
        });

        let result = envelope.seal_edit(&account_key(), &edit);
        assert!(matches!(result, Err(SendError::TypeImmutable)));
    }

    #[test]
    fn test_edit_reuses_fragment_key() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let envelope = envelope_from(sealed.upsert);

        let mut edit = text_draft();
        edit.name = Some("renamed".to_string());
        let upsert = envelope.seal_edit(&account_key(), &edit).unwrap();
        assert_eq!(upsert.id.as_deref(), Some(envelope.id.as_str()));

        // Same fragment bytes: the previously distributed link still derives
        // the content key for the re-encrypted fields.
        let edited = SendEnvelope {
            name: upsert.name.clone(),
            key: upsert.key.clone(),
            ..envelope
        };
        let fragment = edited.unwrap_fragment_key(&account_key()).unwrap();
        assert_eq!(fragment, sealed.fragment_key);
        let view = edited.decrypt(&account_key()).unwrap();
        assert_eq!(view.name.as_deref(), Some("renamed"));
    }

    #[test]
    fn test_edit_requires_readable_envelope() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let envelope = envelope_from(sealed.upsert);
        let other = SymmetricKey::from_bytes([0x99; 32]);
        let result = envelope.seal_edit(&other, &text_draft());
        assert!(matches!(result, Err(SendError::DecryptionFailed)));
    }

    #[test]
    fn test_text_send_requires_payload() {
        let mut draft = text_draft();
        draft.text = None;
        let result = draft.seal(&account_key());
        assert!(matches!(result, Err(SendError::InvalidInput(_))));
    }

    #[test]
    fn test_wire_type_numbering() {
        let json = serde_json::to_value(SendType::File).unwrap();
        assert_eq!(json, serde_json::json!(1));
        let parsed: SendType = serde_json::from_value(serde_json::json!(0)).unwrap();
        assert_eq!(parsed, SendType::Text);
        assert!(serde_json::from_value::<SendType>(serde_json::json!(7)).is_err());
    }

    #[test]
    fn test_upsert_wire_field_names() {
        let sealed = text_draft().seal(&account_key()).unwrap();
        let json = serde_json::to_value(&sealed.upsert).unwrap();
        assert!(json.get("maxAccessCount").is_some());
        assert!(json.get("deletionDate").is_some());
        assert!(json.get("type").is_some());
        // Absent gates stay off the wire entirely.
        assert!(json.get("password").is_none());
        assert!(json.get("emails").is_none());
    }
}
