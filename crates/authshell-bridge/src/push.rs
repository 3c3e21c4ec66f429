//! Push-notification collaborator contract
//!
//! The shell only requests permission, logs the device token, and turns
//! foreground messages into an alert. Delivery policy belongs to the
//! messaging backend.

use authshell_core::types::Notification;
use authshell_core::AuthShellResult;
use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "New Notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
    Ephemeral,
}

impl AuthorizationStatus {
    /// Authorized and provisional permissions both allow delivery
    pub fn is_enabled(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized | AuthorizationStatus::Provisional
        )
    }
}

/// Callback for messages that arrive while the shell is in the foreground.
/// Backends may call it from their own thread.
pub type MessageHandler = Box<dyn FnMut(RemoteMessage) + Send>;

/// Messaging backend the shell registers with
pub trait PushMessaging {
    fn request_permission(&mut self) -> AuthShellResult<AuthorizationStatus>;

    fn token(&mut self) -> AuthShellResult<String>;

    /// Subscribe to foreground messages, replacing any earlier handler
    fn on_message(&mut self, handler: MessageHandler);
}

/// Backend for hosts without push support; never grants permission
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPush;

impl PushMessaging for UnsupportedPush {
    fn request_permission(&mut self) -> AuthShellResult<AuthorizationStatus> {
        Ok(AuthorizationStatus::NotDetermined)
    }

    fn token(&mut self) -> AuthShellResult<String> {
        Err(authshell_core::AuthShellError::push(
            "push messaging is not available on this platform",
        ))
    }

    fn on_message(&mut self, _handler: MessageHandler) {
        log::debug!("No push backend, foreground messages will not arrive");
    }
}

/// Request permission and fetch the device token. Every failure degrades
/// to `None` after logging.
pub fn register_for_push(messaging: &mut impl PushMessaging) -> Option<String> {
    let status = match messaging.request_permission() {
        Ok(status) => status,
        Err(e) => {
            log::warn!("Push permission request failed: {}", e);
            return None;
        }
    };

    if !status.is_enabled() {
        log::info!("Push permission not granted ({:?})", status);
        return None;
    }

    match messaging.token() {
        Ok(token) => {
            log::info!("Push token: {}", token);
            Some(token)
        }
        Err(e) => {
            log::warn!("Failed to fetch push token: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A foreground message delivered by the messaging backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<RemoteNotification>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RemoteMessage {
    /// Alert for a foreground message. A missing body falls back to the
    /// whole message as JSON.
    pub fn to_notification(&self) -> Notification {
        let notification = self.notification.as_ref();
        let title = notification
            .and_then(|n| n.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
        let body = match notification.and_then(|n| n.body.as_deref()) {
            Some(body) if !body.is_empty() => body.to_string(),
            _ => serde_json::to_string(self).unwrap_or_default(),
        };
        Notification::new(title, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notifier, RecordingNotifier};
    use authshell_core::AuthShellError;
    use std::sync::mpsc;

    struct ScriptedPush {
        status: AuthorizationStatus,
        token: Option<&'static str>,
        token_requests: u32,
        handler: Option<MessageHandler>,
    }

    impl ScriptedPush {
        fn new(status: AuthorizationStatus, token: Option<&'static str>) -> Self {
            Self {
                status,
                token,
                token_requests: 0,
                handler: None,
            }
        }

        fn deliver(&mut self, message: RemoteMessage) {
            if let Some(handler) = self.handler.as_mut() {
                handler(message);
            }
        }
    }

    impl PushMessaging for ScriptedPush {
        fn request_permission(&mut self) -> AuthShellResult<AuthorizationStatus> {
            Ok(self.status)
        }

        fn token(&mut self) -> AuthShellResult<String> {
            self.token_requests += 1;
            self.token
                .map(String::from)
                .ok_or_else(|| AuthShellError::push("no token"))
        }

        fn on_message(&mut self, handler: MessageHandler) {
            self.handler = Some(handler);
        }
    }

    #[test]
    fn test_authorized_and_provisional_fetch_token() {
        for status in [AuthorizationStatus::Authorized, AuthorizationStatus::Provisional] {
            let mut push = ScriptedPush::new(status, Some("fcm-1"));
            assert_eq!(register_for_push(&mut push).as_deref(), Some("fcm-1"));
        }
    }

    #[test]
    fn test_denied_skips_token() {
        let mut push = ScriptedPush::new(AuthorizationStatus::Denied, Some("fcm-1"));
        assert_eq!(register_for_push(&mut push), None);
        assert_eq!(push.token_requests, 0);
    }

    #[test]
    fn test_token_failure_degrades() {
        let mut push = ScriptedPush::new(AuthorizationStatus::Authorized, None);
        assert_eq!(register_for_push(&mut push), None);
    }

    #[test]
    fn test_unsupported_push_never_registers() {
        assert_eq!(register_for_push(&mut UnsupportedPush), None);
    }

    #[test]
    fn test_notification_uses_title_and_body() {
        let message: RemoteMessage = serde_json::from_str(
            r#"{"notification":{"title":"Hi","body":"You have mail"}}"#,
        )
        .unwrap();
        assert_eq!(
            message.to_notification(),
            Notification::new("Hi", "You have mail")
        );
    }

    #[test]
    fn test_notification_defaults() {
        let message: RemoteMessage =
            serde_json::from_str(r#"{"data":{"kind":"ping"}}"#).unwrap();
        let alert = message.to_notification();
        assert_eq!(alert.title, "New Notification");
        assert_eq!(alert.body, r#"{"data":{"kind":"ping"}}"#);
    }

    #[test]
    fn test_foreground_message_reaches_notifier() {
        let mut push = ScriptedPush::new(AuthorizationStatus::Authorized, Some("fcm-1"));
        let (tx, rx) = mpsc::channel();
        push.on_message(Box::new(move |message| {
            let _ = tx.send(message);
        }));

        push.deliver(RemoteMessage {
            notification: Some(RemoteNotification {
                title: Some("Hi".to_string()),
                body: Some("You have mail".to_string()),
            }),
            ..Default::default()
        });

        let notifier = RecordingNotifier::new();
        for message in rx.try_iter() {
            notifier.notify(&message.to_notification());
        }
        assert_eq!(notifier.sent(), vec![Notification::new("Hi", "You have mail")]);
    }

    #[test]
    fn test_unsupported_push_drops_handler() {
        let mut push = UnsupportedPush;
        push.on_message(Box::new(|_| panic!("no messages expected")));
    }
}
