//! Sign-in controller (web page side)
//!
//! The page subscribes to auth-state changes; every change that carries a
//! user is followed by a fresh ID token fetch and a credential post over the
//! channel. Posting directly from the callback replaces polling the DOM for
//! signs of a signed-in user. The callback is the only place that posts:
//! `sign_in` just drives the provider, and the SDK reports the result through
//! the subscription. Sign-out clears local state and posts nothing.

use crate::channel::MessageChannel;
use crate::notify::Notifier;
use authshell_core::types::{CredentialPayload, UserProfile};
use authshell_core::AuthShellResult;
use std::cell::RefCell;

/// The authentication SDK, opaque beyond the profile and token it yields
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Run the interactive sign-in (popup or redirect)
    async fn sign_in(&self) -> AuthShellResult<UserProfile>;

    /// Fetch a fresh bearer credential for `user`
    async fn id_token(&self, user: &UserProfile) -> AuthShellResult<String>;

    async fn sign_out(&self) -> AuthShellResult<()>;
}

/// Sending end of the page-to-shell channel. Fire-and-forget.
pub trait MessageSink {
    fn post_message(&self, message: &str);
}

impl<T: MessageSink + ?Sized> MessageSink for &T {
    fn post_message(&self, message: &str) {
        (**self).post_message(message)
    }
}

/// In-process delivery straight into the shell's channel
impl<N: Notifier> MessageSink for MessageChannel<N> {
    fn post_message(&self, message: &str) {
        self.handle(message);
    }
}

/// Sink that keeps every posted message
#[derive(Debug, Default)]
pub struct RecordingSink {
    posted: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.borrow().clone()
    }
}

impl MessageSink for RecordingSink {
    fn post_message(&self, message: &str) {
        self.posted.borrow_mut().push(message.to_string());
    }
}

pub struct SignInController<P, S> {
    provider: P,
    sink: S,
    user: Option<UserProfile>,
}

impl<P: IdentityProvider, S: MessageSink> SignInController<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self {
            provider,
            sink,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Auth-state subscription callback. Fires at least once on load.
    pub async fn on_auth_state_changed(&mut self, user: Option<UserProfile>) {
        self.user = user;
        let Some(user) = self.user.clone() else {
            log::debug!("Auth state changed: signed out");
            return;
        };
        log::debug!("Auth state changed: signed in as {}", user.uid);
        self.post_credentials(&user).await;
    }

    /// Interactive sign-in. The signed-in user arrives through
    /// `on_auth_state_changed`, which posts the credentials.
    pub async fn sign_in(&self) -> AuthShellResult<UserProfile> {
        self.provider.sign_in().await.map_err(|e| {
            log::error!("Login failed: {}", e);
            e
        })
    }

    /// Sign out and drop the local user. Nothing is posted to the shell.
    pub async fn sign_out(&mut self) -> AuthShellResult<()> {
        if let Err(e) = self.provider.sign_out().await {
            log::error!("Logout failed: {}", e);
            return Err(e);
        }
        self.user = None;
        Ok(())
    }

    async fn post_credentials(&self, user: &UserProfile) {
        let token = match self.provider.id_token(user).await {
            Ok(token) => token,
            Err(e) => {
                log::error!("Failed to fetch ID token: {}", e);
                return;
            }
        };
        match serde_json::to_string(&CredentialPayload::login(token, user)) {
            Ok(message) => self.sink.post_message(&message),
            Err(e) => log::error!("Failed to encode credential payload: {}", e),
        }
    }
}
