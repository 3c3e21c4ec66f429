//! Navigation classifier
//!
//! Infers whether the embedded surface has left for an external identity
//! provider, using nothing but the stream of navigated URLs.
//!
//! ```text
//!            provider URL
//!   Idle ──────────────────▶ InExternalAuth
//!    ▲                            │
//!    └────────────────────────────┘
//!         URL under base origin
//! ```
//!
//! There is no timeout: an abandoned provider flow leaves the classifier in
//! `InExternalAuth` until the surface navigates back to the base origin.

use authshell_core::config::{MatchMode, ShellConfig};
use authshell_core::types::{AuthFlowState, NavigationEvent};
use authshell_core::AuthShellResult;
use url::Url;

/// Ordered set of URL patterns denoting identity provider domains or paths
#[derive(Debug, Clone)]
pub struct AuthPatterns {
    patterns: Vec<String>,
    mode: MatchMode,
}

impl AuthPatterns {
    pub fn new<I, S>(patterns: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// True when `url` belongs to an external identity provider flow
    pub fn matches(&self, url: &str) -> bool {
        match self.mode {
            MatchMode::Substring => self.patterns.iter().any(|p| url.contains(p.as_str())),
            MatchMode::Host => match Url::parse(url) {
                Ok(parsed) => self.patterns.iter().any(|p| host_matches(&parsed, p)),
                Err(_) => false,
            },
        }
    }
}

fn host_matches(url: &Url, pattern: &str) -> bool {
    if pattern.contains('/') {
        return url.path().contains(pattern);
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    if pattern.contains('.') {
        host == pattern
            || host
                .strip_suffix(pattern)
                .is_some_and(|prefix| prefix.ends_with('.'))
    } else {
        host.split('.').any(|label| label.contains(pattern))
    }
}

/// A state change produced by one navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EnteredExternalAuth,
    ReturnedToApp,
}

/// Two-state machine driven by navigation events, in navigation order
#[derive(Debug, Clone)]
pub struct NavigationClassifier {
    patterns: AuthPatterns,
    base_origin: String,
    state: AuthFlowState,
}

impl NavigationClassifier {
    pub fn new(patterns: AuthPatterns, base_origin: impl Into<String>) -> Self {
        Self {
            patterns,
            base_origin: base_origin.into(),
            state: AuthFlowState::Idle,
        }
    }

    /// Classifier for the configured patterns and base origin
    pub fn from_config(config: &ShellConfig) -> AuthShellResult<Self> {
        Ok(Self::new(
            AuthPatterns::new(config.auth_patterns.iter().cloned(), config.match_mode),
            config.base_origin()?,
        ))
    }

    pub fn state(&self) -> AuthFlowState {
        self.state
    }

    pub fn in_auth_flow(&self) -> bool {
        self.state.in_auth_flow()
    }

    pub fn base_origin(&self) -> &str {
        &self.base_origin
    }

    /// Feed one navigation. Returns the transition it caused, if any.
    pub fn observe(&mut self, event: &NavigationEvent) -> Option<Transition> {
        log::info!("URL changed: {}", event.url);

        if self.patterns.matches(&event.url) && !self.in_auth_flow() {
            log::info!("Entering auth flow");
            self.state = AuthFlowState::InExternalAuth;
            Some(Transition::EnteredExternalAuth)
        } else if self.in_auth_flow() && event.url.starts_with(&self.base_origin) {
            log::info!("Auth flow completed, returned to app");
            self.state = AuthFlowState::Idle;
            Some(Transition::ReturnedToApp)
        } else {
            None
        }
    }

    /// Back to `Idle`, as on a fresh container
    pub fn reset(&mut self) {
        self.state = AuthFlowState::Idle;
    }
}
