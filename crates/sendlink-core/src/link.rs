//! Share-link parsing and formatting.
//!
//! A share link carries two things: the public `accessId` used to look the
//! Send up anonymously, and the raw fragment key bytes that unlock it. The
//! key lives in the URL fragment so it is never sent to the server or written
//! to server-side logs. Parsing is fully local: a malformed link fails here,
//! before any network call is attempted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use url::Url;

use crate::crypto::FRAGMENT_KEY_LENGTH;
use crate::error::{Result, SendError};

/// Fragment path prefix of the canonical web-vault link form.
const FRAGMENT_PREFIX: &str = "/send/";

/// A parsed share link: anonymous lookup id plus the raw fragment key bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub access_id: String,
    fragment_key: Vec<u8>,
}

impl ShareLink {
    pub fn new(access_id: impl Into<String>, fragment_key: Vec<u8>) -> Self {
        Self {
            access_id: access_id.into(),
            fragment_key,
        }
    }

    /// The raw key bytes extracted from the link.
    ///
    /// # Security
    ///
    /// Never log this value or place it in a request body; only derived
    /// proofs and derived-key ciphertext may leave the client.
    pub fn fragment_key(&self) -> &[u8] {
        &self.fragment_key
    }

    /// Parse a share link.
    ///
    /// Accepts the canonical fragment form
    /// `https://host/#/send/<accessId>/<key>`, the path form
    /// `https://host/<accessId>/<key>`, and a bare `<accessId>/<key>` tail.
    /// The key is never read from a query parameter.
    ///
    /// # Errors
    ///
    /// Returns `SendError::MalformedShareLink` if the shape is wrong or the
    /// key segment is not valid base64url.
    pub fn parse(link: &str) -> Result<Self> {
        let link = link.trim();
        if link.is_empty() {
            return Err(SendError::MalformedShareLink("empty link".to_string()));
        }

        let tail = match Url::parse(link) {
            Ok(url) => {
                // The fragment wins when present; the server never saw it.
                let raw = url.fragment().unwrap_or_else(|| url.path());
                raw.strip_prefix(FRAGMENT_PREFIX)
                    .or_else(|| raw.strip_prefix("send/"))
                    .unwrap_or(raw)
                    .to_string()
            }
            // Not an absolute URL; treat the whole input as the tail.
            Err(_) => link.to_string(),
        };

        let mut segments = tail.trim_matches('/').splitn(2, '/');
        let access_id = segments.next().unwrap_or_default();
        let key_segment = segments.next().unwrap_or_default();

        if access_id.is_empty() || key_segment.is_empty() {
            return Err(SendError::MalformedShareLink(
                "expected <accessId>/<key>".to_string(),
            ));
        }

        let fragment_key = URL_SAFE_NO_PAD
            .decode(key_segment.as_bytes())
            .map_err(|_| SendError::MalformedShareLink("key is not valid base64url".to_string()))?;

        if fragment_key.len() < FRAGMENT_KEY_LENGTH {
            return Err(SendError::MalformedShareLink(format!(
                "key segment too short ({} bytes)",
                fragment_key.len()
            )));
        }

        Ok(Self {
            access_id: access_id.to_string(),
            fragment_key,
        })
    }

    /// Format the canonical fragment-form link for distribution.
    pub fn format(&self, base: &Url) -> String {
        let base = base.as_str().trim_end_matches('/');
        format!(
            "{}/#{}{}/{}",
            base,
            FRAGMENT_PREFIX,
            self.access_id,
            URL_SAFE_NO_PAD.encode(&self.fragment_key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> Vec<u8> {
        vec![0x5A; FRAGMENT_KEY_LENGTH]
    }

    #[test]
    fn test_format_parse_round_trip() {
        let base = Url::parse("https://vault.example.com").unwrap();
        let link = ShareLink::new("AbCdEf123", fragment());
        let formatted = link.format(&base);
        assert!(formatted.starts_with("https://vault.example.com/#/send/AbCdEf123/"));

        let parsed = ShareLink::parse(&formatted).unwrap();
        assert_eq!(parsed, link);
    }

    #[test]
    fn test_parse_bare_tail() {
        let key = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(fragment());
        let parsed = ShareLink::parse(&format!("AbCdEf123/{}", key)).unwrap();
        assert_eq!(parsed.access_id, "AbCdEf123");
        assert_eq!(parsed.fragment_key(), fragment().as_slice());
    }

    #[test]
    fn test_key_never_in_query_or_path() {
        let base = Url::parse("https://vault.example.com").unwrap();
        let link = ShareLink::new("AbCdEf123", fragment());
        let formatted = link.format(&base);
        let url = Url::parse(&formatted).unwrap();
        assert!(url.query().is_none());
        // Everything after '#' is client-side only.
        assert!(url.fragment().is_some());
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let result = ShareLink::parse("AbCdEf123/not!valid!base64!");
        assert!(matches!(result, Err(SendError::MalformedShareLink(_))));
    }

    #[test]
    fn test_missing_key_segment_rejected() {
        assert!(matches!(
            ShareLink::parse("AbCdEf123"),
            Err(SendError::MalformedShareLink(_))
        ));
        assert!(matches!(
            ShareLink::parse("https://vault.example.com/#/send/AbCdEf123"),
            Err(SendError::MalformedShareLink(_))
        ));
        assert!(matches!(
            ShareLink::parse(""),
            Err(SendError::MalformedShareLink(_))
        ));
    }

    #[test]
    fn test_short_key_rejected() {
        let short = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([1u8; 4]);
        let result = ShareLink::parse(&format!("AbCdEf123/{}", short));
        assert!(matches!(result, Err(SendError::MalformedShareLink(_))));
    }

    #[test]
    fn test_parse_path_form() {
        let key = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(fragment());
        let parsed =
            ShareLink::parse(&format!("https://vault.example.com/AbCdEf123/{}", key)).unwrap();
        assert_eq!(parsed.access_id, "AbCdEf123");

        let parsed =
            ShareLink::parse(&format!("https://vault.example.com/send/AbCdEf123/{}", key))
                .unwrap();
        assert_eq!(parsed.access_id, "AbCdEf123");
    }

    #[test]
    fn test_key_never_read_from_query() {
        let key = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(fragment());
        let result = ShareLink::parse(&format!("https://vault.example.com/?key={}", key));
        assert!(matches!(result, Err(SendError::MalformedShareLink(_))));
    }
}
