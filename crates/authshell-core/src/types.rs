//! Common types shared by the shell container and the web page side

use serde::{Deserialize, Serialize};

/// Credential payload posted by the web page across the WebView boundary.
///
/// Wire format: `{"token": "...", "email": "...", "name": "...", "photoURL": "..."}`.
/// Every field is optional on decode; only a non-empty `token` makes the
/// payload a completed login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "photoURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
}

impl CredentialPayload {
    /// Build a login payload from a bearer token and the user's profile fields
    pub fn login(token: impl Into<String>, profile: &UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            email: profile.email.clone(),
            name: profile.display_name.clone(),
            photo_url: profile.photo_url.clone(),
        }
    }

    /// True when the payload carries a non-empty bearer token
    pub fn is_login(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Profile fields of a signed-in user, display-only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// One navigation of the embedded surface, in navigation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: String,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// The shell's belief about whether the surface is inside an external
/// identity provider flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthFlowState {
    #[default]
    Idle,
    InExternalAuth,
}

impl AuthFlowState {
    pub fn in_auth_flow(self) -> bool {
        matches!(self, AuthFlowState::InExternalAuth)
    }
}

/// A user-visible notification (title plus body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_names() {
        let payload: CredentialPayload = serde_json::from_str(
            r#"{"token":"t","email":"a@b.com","name":"Ada","photoURL":"https://p/x.png"}"#,
        )
        .unwrap();
        assert_eq!(payload.photo_url.as_deref(), Some("https://p/x.png"));
        assert!(payload.is_login());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["photoURL"], "https://p/x.png");
    }

    #[test]
    fn test_empty_token_is_not_login() {
        let payload: CredentialPayload =
            serde_json::from_str(r#"{"token":"","name":"Ada"}"#).unwrap();
        assert!(!payload.is_login());

        let payload: CredentialPayload = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert!(!payload.is_login());
    }

    #[test]
    fn test_login_payload_skips_missing_profile_fields() {
        let profile = UserProfile {
            uid: "u1".to_string(),
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&CredentialPayload::login("abc", &profile)).unwrap();
        assert_eq!(json, r#"{"token":"abc","email":"a@b.com"}"#);
    }

    #[test]
    fn test_auth_flow_state_defaults_to_idle() {
        assert_eq!(AuthFlowState::default(), AuthFlowState::Idle);
        assert!(!AuthFlowState::Idle.in_auth_flow());
        assert!(AuthFlowState::InExternalAuth.in_auth_flow());
    }
}
