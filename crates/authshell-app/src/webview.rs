//! Embedded web surface
//!
//! Builds the single WRY WebView that hosts the sign-in page. Every callback
//! the surface exposes (IPC message, navigation, page load, new window) is
//! forwarded to the event loop as a `UserEvent`; nothing is decided on the
//! WebView's own callback thread.

use crate::UserEvent;
use authshell_core::{AuthShellError, AuthShellResult, ShellConfig};
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

/// Create the surface, load `config.base_url`, and wire its callbacks to `proxy`
pub fn build_surface(
    window: &Window,
    config: &ShellConfig,
    init_script: &str,
    proxy: EventLoopProxy<UserEvent>,
) -> AuthShellResult<WebView> {
    let ipc_proxy = proxy.clone();
    let nav_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let window_proxy = proxy;

    let builder = WebViewBuilder::new()
        .with_url(config.base_url.as_str())
        .with_devtools(config.devtools)
        .with_clipboard(true)
        .with_initialization_script(init_script)
        .with_ipc_handler(move |message| {
            let body = message.body().to_string();
            let _ = ipc_proxy.send_event(UserEvent::ChannelMessage(body));
        })
        .with_navigation_handler(move |url| {
            let _ = nav_proxy.send_event(UserEvent::Navigated(url));
            true
        })
        .with_on_page_load_handler(move |event, url| match event {
            PageLoadEvent::Started => {
                let _ = load_proxy.send_event(UserEvent::LoadStarted(url));
            }
            PageLoadEvent::Finished => {
                let _ = load_proxy.send_event(UserEvent::LoadFinished(url));
            }
        })
        .with_new_window_req_handler(move |url| {
            // Popups (provider sign-in windows included) replace the current page.
            let _ = window_proxy.send_event(UserEvent::OpenInPlace(url));
            false
        });

    attach(builder, window)
}

#[cfg(not(target_os = "linux"))]
fn attach(builder: WebViewBuilder<'_>, window: &Window) -> AuthShellResult<WebView> {
    builder
        .build(window)
        .map_err(|e| AuthShellError::webview(e.to_string()))
}

#[cfg(target_os = "linux")]
fn attach(builder: WebViewBuilder<'_>, window: &Window) -> AuthShellResult<WebView> {
    use tao::platform::unix::WindowExtUnix;
    use wry::WebViewBuilderExtUnix;

    let vbox = window
        .default_vbox()
        .ok_or_else(|| AuthShellError::webview("window has no GTK container"))?;
    builder
        .build_gtk(vbox)
        .map_err(|e| AuthShellError::webview(e.to_string()))
}

/// Load `url` in the surface, logging instead of failing
pub fn load_url(webview: &WebView, url: &str) {
    if let Err(e) = webview.load_url(url) {
        tracing::error!("Failed to load {}: {}", url, e);
    }
}

/// Get the current WebView engine name
pub fn engine_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "WebView2 (WRY)";

    #[cfg(target_os = "macos")]
    return "WKWebView (WRY)";

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    return "WebKitGTK (WRY)";
}
