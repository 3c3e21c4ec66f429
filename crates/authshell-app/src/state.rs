//! Shell container state
//!
//! Owned by the event loop; every embedded-surface callback is forwarded as a
//! `UserEvent` and applied here in delivery order, so the auth-flow state has
//! exactly one writer.

use authshell_bridge::push::RemoteMessage;
use authshell_bridge::{ChannelOutcome, MessageChannel, NavigationClassifier, Notifier, Transition};
use authshell_core::types::{AuthFlowState, NavigationEvent};
use authshell_core::{AuthShellResult, ShellConfig};

pub struct ShellState<N: Notifier> {
    channel: MessageChannel<N>,
    classifier: NavigationClassifier,
    base_url: String,
    title: String,
    initial_load_done: bool,
}

impl<N: Notifier> ShellState<N> {
    pub fn new(config: &ShellConfig, notifier: N) -> AuthShellResult<Self> {
        Ok(Self {
            channel: MessageChannel::new(notifier),
            classifier: NavigationClassifier::from_config(config)?,
            base_url: config.base_url.clone(),
            title: config.window.title.clone(),
            initial_load_done: false,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_flow(&self) -> AuthFlowState {
        self.classifier.state()
    }

    /// Raw message from the page
    pub fn on_message(&self, raw: &str) -> ChannelOutcome {
        self.channel.handle(raw)
    }

    /// Foreground push message, alerted like a login
    pub fn on_push_message(&self, message: &RemoteMessage) {
        tracing::info!("Foreground push message received");
        self.channel.notifier().notify(&message.to_notification());
    }

    pub fn on_navigation(&mut self, url: String) -> Option<Transition> {
        self.classifier.observe(&NavigationEvent::new(url))
    }

    /// Window title while the surface loads; the loading marker is only
    /// shown until the first page finishes.
    pub fn on_load_started(&self, url: &str) -> String {
        tracing::info!("Started loading: {}", url);
        self.window_title()
    }

    pub fn on_load_finished(&mut self, url: &str) -> String {
        tracing::info!("Finished loading: {}", url);
        self.initial_load_done = true;
        self.window_title()
    }

    /// The base URL is about to be reloaded from scratch. Returns the new
    /// window title.
    pub fn on_retry(&mut self) -> String {
        self.classifier.reset();
        self.initial_load_done = false;
        self.window_title()
    }

    pub fn window_title(&self) -> String {
        if self.initial_load_done {
            self.title.clone()
        } else {
            format!("{} (loading)", self.title)
        }
    }
}
