//! Compatibility shim injected before page scripts run
//!
//! The hosted page posts credentials through a well-known global object
//! (`window.ReactNativeWebView.postMessage`). Outside a mobile shell that
//! object does not exist, so the shim installs one that forwards to the
//! WebView's native IPC channel (`window.ipc.postMessage`).

use authshell_core::config::{FallbackPollConfig, ShellConfig};

/// Event dispatched on `window` when the fallback poll sees a signed-in user
pub const USER_DETECTED_EVENT: &str = "userdetected";

/// Bounded DOM poll that nudges the page to resend its auth state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPoll {
    pub selector: String,
    pub interval_ms: u32,
    pub max_polls: u32,
    pub settle_ms: u32,
}

impl From<&FallbackPollConfig> for FallbackPoll {
    fn from(config: &FallbackPollConfig) -> Self {
        Self {
            selector: config.selector.clone(),
            interval_ms: config.interval_ms.max(1),
            max_polls: config.max_polls,
            settle_ms: config.settle_ms,
        }
    }
}

/// Renders the initialization script for the embedded surface
#[derive(Debug, Clone)]
pub struct CompatibilityShim {
    bridge_object: String,
    fallback_poll: Option<FallbackPoll>,
}

impl CompatibilityShim {
    pub fn new(bridge_object: impl Into<String>) -> Self {
        Self {
            bridge_object: bridge_object.into(),
            fallback_poll: None,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.bridge_object.clone())
            .with_fallback_poll(config.fallback_poll.as_ref().map(FallbackPoll::from))
    }

    pub fn with_fallback_poll(mut self, poll: Option<FallbackPoll>) -> Self {
        self.fallback_poll = poll;
        self
    }

    /// The script to pass to the WebView as its initialization script
    pub fn render(&self) -> String {
        let mut script = String::with_capacity(2048);
        script.push_str("(function() {\n");
        script.push_str(&format!(
            "  var bridgeName = {};\n",
            js_string(&self.bridge_object)
        ));
        script.push_str(INSTALL_BRIDGE);
        if let Some(poll) = &self.fallback_poll {
            script.push_str(&render_poll(poll));
        }
        script.push_str(ERROR_LISTENER);
        script.push_str("  true;\n})();\n");
        script
    }
}

fn render_poll(poll: &FallbackPoll) -> String {
    format!(
        r#"  try {{
    var selector = {selector};
    var polls = 0;
    var checkForUser = setInterval(function() {{
      try {{
        polls += 1;
        if (document.querySelector(selector)) {{
          clearInterval(checkForUser);
          console.log('[authshell] user detected, requesting auth state resend');
          setTimeout(function() {{
            try {{ window.dispatchEvent(new Event({event})); }} catch (e) {{}}
          }}, {settle});
        }} else if (polls >= {max}) {{
          clearInterval(checkForUser);
        }}
      }} catch (e) {{
        clearInterval(checkForUser);
      }}
    }}, {interval});
  }} catch (e) {{
    console.log('[authshell] fallback poll not installed: ' + e);
  }}
"#,
        selector = js_string(&poll.selector),
        event = js_string(USER_DETECTED_EVENT),
        settle = poll.settle_ms,
        max = poll.max_polls,
        interval = poll.interval_ms,
    )
}

// JSON string literals are valid JavaScript string literals.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace("</", "<\\/")
}

const INSTALL_BRIDGE: &str = r#"  try {
    if (!window[bridgeName]) {
      console.log('[authshell] installing ' + bridgeName);
      window[bridgeName] = {
        postMessage: function(data) {
          try {
            window.ipc.postMessage(String(data));
          } catch (e) {
            console.log('[authshell] postMessage failed: ' + e);
          }
        }
      };
    }
  } catch (e) {
    console.log('[authshell] bridge not installed: ' + e);
  }
"#;

const ERROR_LISTENER: &str = r#"  try {
    window.addEventListener('error', function(e) {
      console.log('[authshell] error caught: ' + e.message);
    });
  } catch (e) {}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installs_bridge_only_when_absent() {
        let script = CompatibilityShim::new("ReactNativeWebView").render();
        assert!(script.contains(r#"var bridgeName = "ReactNativeWebView";"#));
        assert!(script.contains("if (!window[bridgeName])"));
        assert!(script.contains("window.ipc.postMessage(String(data))"));
        assert!(script.trim_end().ends_with("true;\n})();"));
    }

    #[test]
    fn test_no_poll_by_default() {
        let script = CompatibilityShim::new("ReactNativeWebView").render();
        assert!(!script.contains("setInterval"));
        assert!(!script.contains(USER_DETECTED_EVENT));
    }

    #[test]
    fn test_poll_is_bounded() {
        let poll = FallbackPoll {
            selector: r#"[aria-label="Account"]"#.to_string(),
            interval_ms: 500,
            max_polls: 7,
            settle_ms: 250,
        };
        let script = CompatibilityShim::new("Bridge")
            .with_fallback_poll(Some(poll))
            .render();
        assert!(script.contains(r#"var selector = "[aria-label=\"Account\"]";"#));
        assert!(script.contains("polls >= 7"));
        assert!(script.contains("}, 500);"));
        assert!(script.contains("}, 250);"));
        assert_eq!(script.matches("clearInterval(checkForUser)").count(), 3);
    }

    #[test]
    fn test_configured_strings_cannot_escape_literals() {
        let script = CompatibilityShim::new("x\"; alert(1); //</script>").render();
        assert!(script.contains(r#"var bridgeName = "x\"; alert(1); //<\/script>";"#));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = FallbackPollConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(FallbackPoll::from(&config).interval_ms, 1);
    }
}
