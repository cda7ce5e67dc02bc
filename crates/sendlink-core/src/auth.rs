//! Auth-gate resolution for Send creation and editing.
//!
//! A Send is protected by exactly one gate: nothing, a password, or an
//! email-OTP list. Gate inputs arrive through two channels (CLI flags and a
//! JSON body) and must resolve to a single gate before anything is encrypted
//! or sent. The same resolution runs on creation and on edit.

use crate::error::{Result, SendError};

/// The access-gate category for a Send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Anyone holding the link can access.
    None,
    /// A password proof must accompany the access request.
    Password,
    /// A one-time token delivered out of band must accompany the request.
    Email,
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthType::None => write!(f, "none"),
            AuthType::Password => write!(f, "password"),
            AuthType::Email => write!(f, "email"),
        }
    }
}

/// The resolved gate, constructed once and passed immutably downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthGate {
    None,
    Password(String),
    Email(Vec<String>),
}

impl AuthGate {
    pub fn auth_type(&self) -> AuthType {
        match self {
            AuthGate::None => AuthType::None,
            AuthGate::Password(_) => AuthType::Password,
            AuthGate::Email(_) => AuthType::Email,
        }
    }
}

/// Resolve CLI-flag and JSON-body gate inputs into exactly one [`AuthGate`].
///
/// Per-field precedence: a non-empty CLI value wins over the JSON value for
/// the *same* field. Cross-field conflicts are never resolved by precedence:
/// if an effective email list and an effective password are both present,
/// whichever channels they came from, resolution fails with
/// `ConflictingAuthGates`.
///
/// Empty lists, missing values, and whitespace-only strings all count as
/// absent.
pub fn resolve(
    cli_emails: Option<&[String]>,
    cli_password: Option<&str>,
    json_emails: Option<&[String]>,
    json_password: Option<&str>,
) -> Result<AuthGate> {
    let effective_emails = pick_emails(cli_emails).or_else(|| pick_emails(json_emails));
    let effective_password = pick_password(cli_password).or_else(|| pick_password(json_password));

    match (effective_emails, effective_password) {
        (Some(_), Some(_)) => Err(SendError::ConflictingAuthGates),
        (Some(emails), None) => Ok(AuthGate::Email(emails)),
        (None, Some(password)) => Ok(AuthGate::Password(password)),
        (None, None) => Ok(AuthGate::None),
    }
}

/// A trimmed, non-empty email list, or `None` if the field is absent.
fn pick_emails(emails: Option<&[String]>) -> Option<Vec<String>> {
    let trimmed: Vec<String> = emails?
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// A non-blank password, or `None` if the field is absent.
fn pick_password(password: Option<&str>) -> Option<String> {
    let password = password?;
    if password.trim().is_empty() {
        None
    } else {
        Some(password.to_string())
    }
}

/// Serialize an email list to the flat comma-joined wire form.
pub fn join_emails(emails: &[String]) -> String {
    emails
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the wire form back into a trimmed list.
///
/// An empty or missing string produces an empty list, never `[""]`.
pub fn split_emails(joined: Option<&str>) -> Vec<String> {
    match joined {
        None => Vec::new(),
        Some(s) => s
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_neither_gate_yields_none() {
        assert_eq!(resolve(None, None, None, None).unwrap(), AuthGate::None);
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            resolve(Some(&empty), Some(""), Some(&empty), Some("   ")).unwrap(),
            AuthGate::None
        );
    }

    #[test]
    fn test_emails_only_yields_email_gate() {
        let list = emails(&["a@x.com", " b@x.com "]);
        let gate = resolve(Some(&list), None, None, None).unwrap();
        assert_eq!(gate, AuthGate::Email(emails(&["a@x.com", "b@x.com"])));
        assert_eq!(gate.auth_type(), AuthType::Email);
    }

    #[test]
    fn test_password_only_yields_password_gate() {
        let gate = resolve(None, Some("hunter2"), None, None).unwrap();
        assert_eq!(gate, AuthGate::Password("hunter2".to_string()));
    }

    #[test]
    fn test_both_gates_same_channel_conflict() {
        let list = emails(&["a@x.com"]);
        let result = resolve(Some(&list), Some("hunter2"), None, None);
        assert!(matches!(result, Err(SendError::ConflictingAuthGates)));

        let result = resolve(None, None, Some(&list), Some("hunter2"));
        assert!(matches!(result, Err(SendError::ConflictingAuthGates)));
    }

    #[test]
    fn test_cross_channel_conflict() {
        // CLI password + JSON emails: each channel alone is unambiguous, but
        // together they still conflict.
        let list = emails(&["a@x.com"]);
        let result = resolve(None, Some("hunter2"), Some(&list), None);
        assert!(matches!(result, Err(SendError::ConflictingAuthGates)));

        let result = resolve(Some(&list), None, None, Some("hunter2"));
        assert!(matches!(result, Err(SendError::ConflictingAuthGates)));
    }

    #[test]
    fn test_cli_wins_over_json_for_same_field() {
        let cli = emails(&["cli@x.com"]);
        let json = emails(&["json@x.com"]);
        let gate = resolve(Some(&cli), None, Some(&json), None).unwrap();
        assert_eq!(gate, AuthGate::Email(emails(&["cli@x.com"])));

        let gate = resolve(None, Some("cli-pw"), None, Some("json-pw")).unwrap();
        assert_eq!(gate, AuthGate::Password("cli-pw".to_string()));
    }

    #[test]
    fn test_whitespace_emails_are_absent() {
        let list = emails(&["  ", ""]);
        assert_eq!(resolve(Some(&list), None, None, None).unwrap(), AuthGate::None);
    }

    #[test]
    fn test_join_split_round_trip() {
        let list = emails(&["a@x.com", " b@x.com "]);
        let joined = join_emails(&list);
        assert_eq!(joined, "a@x.com,b@x.com");
        assert_eq!(split_emails(Some(&joined)), emails(&["a@x.com", "b@x.com"]));
    }

    #[test]
    fn test_split_empty_yields_empty_list() {
        assert!(split_emails(None).is_empty());
        assert!(split_emails(Some("")).is_empty());
        assert!(split_emails(Some("  ,  ")).is_empty());
    }
}
