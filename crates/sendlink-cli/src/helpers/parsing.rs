//! JSON body parsing and flag/body merging for `create` and `edit`.
//!
//! The body is plaintext user input; nothing in it is encrypted yet. Gate
//! inputs can arrive both here and as flags, and must resolve to exactly one
//! gate before any sealing happens.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use sendlink_core::auth;
use sendlink_core::envelope::{FileDraft, SendDraft, SendType, TextDraft};
use sendlink_core::error::{Result, SendError};

/// Default lifetime when the body names no deletion date.
const DEFAULT_LIFETIME_DAYS: i64 = 7;

/// Plaintext Send body as the user writes it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendBody {
    #[serde(rename = "type")]
    pub send_type: Option<i32>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub text: Option<TextBody>,
    pub file: Option<FileBody>,
    pub password: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    pub max_access_count: Option<i32>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub deletion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hide_email: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    pub text: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBody {
    pub file_name: String,
    pub size: u64,
}

/// Decode the raw BODY argument into a [`SendBody`].
pub fn parse_body(raw: &str, base64_encoded: bool) -> Result<SendBody> {
    let json = if base64_encoded {
        let decoded = STANDARD
            .decode(raw.trim())
            .map_err(|_| SendError::InvalidInput("Body is not valid base64".to_string()))?;
        String::from_utf8(decoded)
            .map_err(|_| SendError::InvalidInput("Body is not valid UTF-8".to_string()))?
    } else {
        raw.to_string()
    };
    let body: SendBody = serde_json::from_str(&json)
        .map_err(|e| SendError::InvalidInput(format!("Invalid JSON body: {}", e)))?;
    Ok(body)
}

/// Merge flags and body into a sealed-ready draft.
///
/// Gate resolution happens here, before any key material exists: a conflict
/// aborts the whole command with nothing encrypted and nothing sent.
pub fn build_draft(
    body: SendBody,
    cli_emails: &[String],
    cli_password: Option<&str>,
) -> Result<SendDraft> {
    let gate = auth::resolve(
        if cli_emails.is_empty() {
            None
        } else {
            Some(cli_emails)
        },
        cli_password,
        if body.emails.is_empty() {
            None
        } else {
            Some(&body.emails)
        },
        body.password.as_deref(),
    )?;

    let send_type = match body.send_type {
        Some(raw) => SendType::try_from(raw).map_err(SendError::InvalidInput)?,
        None => match (&body.text, &body.file) {
            (Some(_), None) => SendType::Text,
            (None, Some(_)) => SendType::File,
            _ => {
                return Err(SendError::InvalidInput(
                    "Body must contain exactly one of \"text\" or \"file\"".to_string(),
                ))
            }
        },
    };

    Ok(SendDraft {
        send_type,
        name: body.name,
        notes: body.notes,
        text: body.text.map(|t| TextDraft {
            text: t.text,
            hidden: t.hidden,
        }),
        file: body.file.map(|f| FileDraft {
            file_name: f.file_name,
            size: f.size,
        }),
        gate,
        max_access_count: body.max_access_count,
        expiration_date: body.expiration_date,
        deletion_date: body
            .deletion_date
            .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_LIFETIME_DAYS)),
        disabled: body.disabled,
        hide_email: body.hide_email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendlink_core::AuthGate;

    #[test]
    fn test_parse_inline_body() {
        let body = parse_body(r#"{"text":{"text":"hi"},"name":"n"}"#, false).unwrap();
        assert_eq!(body.name.as_deref(), Some("n"));
        assert_eq!(body.text.unwrap().text, "hi");
    }

    #[test]
    fn test_parse_base64_body() {
        let encoded = STANDARD.encode(r#"{"text":{"text":"hi"}}"#);
        let body = parse_body(&encoded, true).unwrap();
        assert_eq!(body.text.unwrap().text, "hi");
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = parse_body("{not json", false);
        assert!(matches!(result, Err(SendError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = parse_body(r#"{"text":{"text":"hi"},"bogus":1}"#, false);
        assert!(matches!(result, Err(SendError::InvalidInput(_))));
    }

    #[test]
    fn test_flag_password_wins_over_body_password() {
        let body = parse_body(r#"{"text":{"text":"hi"},"password":"body-pw"}"#, false).unwrap();
        let draft = build_draft(body, &[], Some("flag-pw")).unwrap();
        assert_eq!(draft.gate, AuthGate::Password("flag-pw".to_string()));
    }

    #[test]
    fn test_cross_channel_conflict_fails() {
        let body = parse_body(r#"{"text":{"text":"hi"},"emails":["a@x.com"]}"#, false).unwrap();
        let result = build_draft(body, &[], Some("flag-pw"));
        assert!(matches!(result, Err(SendError::ConflictingAuthGates)));
    }

    #[test]
    fn test_type_inferred_from_payload() {
        let body = parse_body(r#"{"file":{"fileName":"a.pdf","size":10}}"#, false).unwrap();
        let draft = build_draft(body, &[], None).unwrap();
        assert_eq!(draft.send_type, SendType::File);
    }

    #[test]
    fn test_missing_payload_rejected() {
        let body = parse_body(r#"{"name":"n"}"#, false).unwrap();
        let result = build_draft(body, &[], None);
        assert!(matches!(result, Err(SendError::InvalidInput(_))));
    }

    #[test]
    fn test_deletion_date_defaults_forward() {
        let body = parse_body(r#"{"text":{"text":"hi"}}"#, false).unwrap();
        let draft = build_draft(body, &[], None).unwrap();
        assert!(draft.deletion_date > Utc::now());
    }
}
