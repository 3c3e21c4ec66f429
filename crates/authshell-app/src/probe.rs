//! Page reachability probe
//!
//! The WebView reports load start and finish but not transport failures or
//! HTTP status codes, so a plain GET of the base URL runs alongside the first
//! load and every retry.

use authshell_core::{AuthShellError, AuthShellResult};
use std::time::Duration;

pub fn probe_page(url: &str, timeout: Duration) -> AuthShellResult<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AuthShellError::load(format!("HTTP client unavailable: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| AuthShellError::load(format!("Network error: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthShellError::load(format!("HTTP Error {}", status.as_u16())));
    }
    Ok(())
}

/// Run the probe off the event loop thread; `on_failure` gets the error text.
pub fn spawn_probe<F>(url: String, timeout: Duration, on_failure: F)
where
    F: FnOnce(String) + Send + 'static,
{
    std::thread::spawn(move || {
        if let Err(e) = probe_page(&url, timeout) {
            tracing::error!("WebView error: {}", e);
            on_failure(e.to_string());
        }
    });
}
