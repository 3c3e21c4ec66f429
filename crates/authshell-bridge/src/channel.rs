//! Message channel parser
//!
//! Receives the raw strings the page posts through the bridge object and
//! turns credential payloads into a single user notification. Nothing in
//! here returns an error: a malformed message is logged and dropped.

use crate::notify::Notifier;
use authshell_core::types::{CredentialPayload, Notification};
use serde_json::{Map, Value};

const NAME_PLACEHOLDER: &str = "User";
const EMAIL_PLACEHOLDER: &str = "No email";
const LOGIN_TITLE: &str = "Login Successful";

/// What the channel made of one raw message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// Empty or whitespace-only message
    Empty,
    /// Not JSON, or JSON that is not an object
    Malformed,
    /// A JSON object without a usable token
    Informational,
    /// A completed login
    Login(LoginSummary),
}

/// The display fields surfaced for a completed login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSummary {
    pub name: String,
    pub email: String,
}

impl LoginSummary {
    fn from_payload(payload: &CredentialPayload) -> Self {
        Self {
            name: non_empty_or(payload.name.as_deref(), NAME_PLACEHOLDER),
            email: non_empty_or(payload.email.as_deref(), EMAIL_PLACEHOLDER),
        }
    }

    pub fn to_notification(&self) -> Notification {
        Notification::new(
            LOGIN_TITLE,
            format!("Welcome {} ({})", self.name, self.email),
        )
    }
}

fn non_empty_or(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Shell-side end of the one-directional page-to-shell channel
pub struct MessageChannel<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> MessageChannel<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handle one raw message. Sends exactly one notification per login.
    pub fn handle(&self, raw: &str) -> ChannelOutcome {
        let outcome = classify(raw);
        if let ChannelOutcome::Login(summary) = &outcome {
            log::info!("Auth token received");
            self.notifier.notify(&summary.to_notification());
        }
        outcome
    }
}

/// Decode a raw message without side effects beyond logging
pub fn classify(raw: &str) -> ChannelOutcome {
    log::debug!("Raw WebView message received: {}", raw);

    if raw.trim().is_empty() {
        log::error!("No data received in message");
        return ChannelOutcome::Empty;
    }

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            log::error!("Message from WebView is not a JSON object: {}", other);
            log::error!("Raw data: {}", raw);
            return ChannelOutcome::Malformed;
        }
        Err(e) => {
            log::error!("Failed to parse message from WebView: {}", e);
            log::error!("Raw data: {}", raw);
            return ChannelOutcome::Malformed;
        }
    };

    // Only the token decides a login. A display field of the wrong type is
    // treated as absent.
    let payload = CredentialPayload {
        token: string_field(&object, "token"),
        email: string_field(&object, "email"),
        name: string_field(&object, "name"),
        photo_url: string_field(&object, "photoURL"),
    };

    if payload.is_login() {
        ChannelOutcome::Login(LoginSummary::from_payload(&payload))
    } else {
        log::debug!("Message carries no string token, ignoring");
        ChannelOutcome::Informational
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
