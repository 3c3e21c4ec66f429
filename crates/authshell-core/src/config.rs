//! Shell configuration

use crate::error::{AuthShellError, AuthShellResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://nextjs-app-iota-five.vercel.app";

/// Identity provider sign-in domain, auth-service domain, identity-toolkit
/// domain and callback path, in that order.
const DEFAULT_AUTH_PATTERNS: [&str; 4] = [
    "accounts.google.com",
    "firebaseauth",
    "identitytoolkit",
    "auth/callback",
];

/// Shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// URL of the hosted sign-in page; its origin is the app's own origin
    pub base_url: String,

    /// Substrings identifying identity provider domains or callback paths
    pub auth_patterns: Vec<String>,

    /// How `auth_patterns` are matched against navigated URLs
    pub match_mode: MatchMode,

    /// Name of the global object the page posts credentials through
    pub bridge_object: String,

    /// Optional DOM polling fallback for resending auth state
    pub fallback_poll: Option<FallbackPollConfig>,

    /// Window settings
    pub window: WindowConfig,

    /// Enable WebView devtools
    pub devtools: bool,

    /// Timeout for the page reachability probe, in seconds
    pub load_timeout_secs: u64,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-sensitive substring containment anywhere in the URL
    #[default]
    Substring,
    /// Compare against the parsed host (or path for patterns with a `/`)
    Host,
}

impl std::str::FromStr for MatchMode {
    type Err = AuthShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "host" => Ok(MatchMode::Host),
            other => Err(AuthShellError::config(format!(
                "unknown match mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPollConfig {
    /// CSS selector that appears once the user is authenticated
    pub selector: String,

    /// Poll interval in milliseconds
    pub interval_ms: u32,

    /// Upper bound on the number of polls
    pub max_polls: u32,

    /// Delay between detection and the resend signal, in milliseconds
    pub settle_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_patterns: DEFAULT_AUTH_PATTERNS.iter().map(|p| p.to_string()).collect(),
            match_mode: MatchMode::default(),
            bridge_object: "ReactNativeWebView".to_string(),
            fallback_poll: None,
            window: WindowConfig::default(),
            devtools: cfg!(debug_assertions),
            load_timeout_secs: 15,
            log_level: "info".to_string(),
        }
    }
}

impl Default for FallbackPollConfig {
    fn default() -> Self {
        Self {
            selector: r#"[aria-label="Account"]"#.to_string(),
            interval_ms: 1000,
            max_polls: 30,
            settle_ms: 1000,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sign In".to_string(),
            width: 420.0,
            height: 800.0,
        }
    }
}

impl ShellConfig {
    /// Default config file location: `<config dir>/authshell/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("authshell").join("config.json"))
    }

    /// Load the config from `path` (or the default location), then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> AuthShellResult<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) if path.exists() => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) if path_is_explicit(&path) => {
                return Err(AuthShellError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            _ => {
                log::info!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> AuthShellResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply `AUTHSHELL_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AuthShellResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("AUTHSHELL_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(patterns) = lookup("AUTHSHELL_AUTH_PATTERNS") {
            self.auth_patterns = patterns
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(mode) = lookup("AUTHSHELL_MATCH_MODE") {
            self.match_mode = mode.parse()?;
        }
        if let Some(level) = lookup("AUTHSHELL_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Check the values the shell cannot run without
    pub fn validate(&self) -> AuthShellResult<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(AuthShellError::config(format!(
                "base_url must be an absolute http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.auth_patterns.is_empty() {
            return Err(AuthShellError::config("auth_patterns must not be empty"));
        }
        if self.auth_patterns.iter().any(|p| p.is_empty()) {
            return Err(AuthShellError::config(
                "auth_patterns must not contain empty entries",
            ));
        }
        if self.bridge_object.is_empty() {
            return Err(AuthShellError::config("bridge_object must not be empty"));
        }
        Ok(())
    }

    /// Origin of `base_url` without a trailing slash, e.g. `https://app.example`
    pub fn base_origin(&self) -> AuthShellResult<String> {
        let url = Url::parse(&self.base_url)?;
        Ok(url.origin().ascii_serialization())
    }
}

// The default location is optional; a path the caller named is not.
fn path_is_explicit(path: &Path) -> bool {
    Some(path) != ShellConfig::default_path().as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShellConfig::default();
        config.validate().unwrap();
        assert_eq!(config.auth_patterns.len(), 4);
        assert_eq!(config.auth_patterns[0], "accounts.google.com");
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert!(config.fallback_poll.is_none());
    }

    #[test]
    fn test_base_origin_strips_path() {
        let config = ShellConfig {
            base_url: "https://app.example.com/login?x=1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_origin().unwrap(), "https://app.example.com");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ShellConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ShellConfig {
            base_url: "file:///tmp/index.html".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AuthShellError::Config(_))));

        let config = ShellConfig {
            auth_patterns: vec!["accounts.google.com".to_string(), String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AUTHSHELL_BASE_URL", "https://staging.example.com"),
            ("AUTHSHELL_AUTH_PATTERNS", "login.example.com, ,sso/callback"),
            ("AUTHSHELL_MATCH_MODE", "host"),
        ]
        .into_iter()
        .collect();

        let mut config = ShellConfig::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.auth_patterns, vec!["login.example.com", "sso/callback"]);
        assert_eq!(config.match_mode, MatchMode::Host);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_match_mode_is_an_error() {
        let mut config = ShellConfig::default();
        let result = config.apply_env_overrides(|key| {
            (key == "AUTHSHELL_MATCH_MODE").then(|| "regex".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_url":"https://app.example.com","fallback_poll":{"max_polls":5}}"#,
        )
        .unwrap();

        let config = ShellConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "https://app.example.com");
        assert_eq!(config.bridge_object, "ReactNativeWebView");
        let poll = config.fallback_poll.unwrap();
        assert_eq!(poll.max_polls, 5);
        assert_eq!(poll.interval_ms, 1000);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(ShellConfig::load(Some(&missing)).is_err());
    }
}
