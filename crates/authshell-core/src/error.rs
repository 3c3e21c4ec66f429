//! Error types for authshell

use thiserror::Error;

/// Result type alias for authshell operations
pub type AuthShellResult<T> = Result<T, AuthShellError>;

/// Main error type for authshell
#[derive(Error, Debug)]
pub enum AuthShellError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Push messaging error: {0}")]
    Push(String),

    #[error("WebView error: {0}")]
    WebView(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuthShellError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new identity provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new push messaging error
    pub fn push(msg: impl Into<String>) -> Self {
        Self::Push(msg.into())
    }

    /// Create a new WebView error
    pub fn webview(msg: impl Into<String>) -> Self {
        Self::WebView(msg.into())
    }

    /// Create a new page load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }
}
