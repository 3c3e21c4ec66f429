//! authshell - Main Application Entry Point
//!
//! A single window hosting the sign-in page in a system WebView. The page
//! posts its credential payload through the injected bridge object; the
//! shell watches navigations to tell when the page has left for the
//! identity provider and when it has come back.

mod dialog;
mod probe;
mod state;
mod webview;

use anyhow::Context;
use authshell_bridge::push::{register_for_push, PushMessaging, RemoteMessage, UnsupportedPush};
use authshell_bridge::{ChannelOutcome, CompatibilityShim, Transition};
use authshell_core::ShellConfig;
use dialog::DialogNotifier;
use state::ShellState;
use std::path::PathBuf;
use std::time::Duration;
use tao::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
    window::WindowBuilder,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use webview::engine_name;

/// Events forwarded from the embedded surface and background work to the
/// event loop
#[derive(Debug)]
pub enum UserEvent {
    ChannelMessage(String),
    Navigated(String),
    OpenInPlace(String),
    LoadStarted(String),
    LoadFinished(String),
    LoadFailed(String),
    RetryLoad,
    PushMessage(RemoteMessage),
}

fn main() {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match ShellConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("authshell: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&config.log_level);

    if let Err(e) = run(config) {
        error!("Failed to start shell: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_level: &str) {
    // Route the bridge crates' `log` records through tracing.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("authshell: failed to set log tracer: {}", e);
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("authshell: failed to set subscriber: {}", e);
    }
}

fn run(config: ShellConfig) -> anyhow::Result<()> {
    info!("Starting authshell...");
    info!("WebView engine: {}", engine_name());
    info!("Base URL: {}", config.base_url);

    let mut state = ShellState::new(&config, DialogNotifier)?;

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let mut push = UnsupportedPush;
    if register_for_push(&mut push).is_none() {
        info!("Push notifications disabled");
    }
    let push_proxy = proxy.clone();
    push.on_message(Box::new(move |message| {
        let _ = push_proxy.send_event(UserEvent::PushMessage(message));
    }));

    let window = WindowBuilder::new()
        .with_title(state.window_title())
        .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
        .build(&event_loop)
        .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

    let shim = CompatibilityShim::from_config(&config).render();
    let surface = webview::build_surface(&window, &config, &shim, proxy.clone())
        .context("Failed to create WebView")?;
    info!("WebView created");

    let load_timeout = Duration::from_secs(config.load_timeout_secs);
    start_probe(&proxy, state.base_url(), load_timeout);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Window close requested, shutting down...");
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(user_event) => match user_event {
                UserEvent::ChannelMessage(raw) => {
                    if let ChannelOutcome::Login(summary) = state.on_message(&raw) {
                        info!("Signed in as {} ({})", summary.name, summary.email);
                    }
                }
                UserEvent::Navigated(url) => match state.on_navigation(url) {
                    Some(Transition::EnteredExternalAuth) => {
                        info!("Surface left for the identity provider");
                    }
                    Some(Transition::ReturnedToApp) => {
                        info!("Surface back on the app origin");
                    }
                    None => {}
                },
                UserEvent::OpenInPlace(url) => {
                    info!("Opening new window request in place: {}", url);
                    webview::load_url(&surface, &url);
                }
                UserEvent::LoadStarted(url) => {
                    window.set_title(&state.on_load_started(&url));
                }
                UserEvent::LoadFinished(url) => {
                    window.set_title(&state.on_load_finished(&url));
                }
                UserEvent::LoadFailed(detail) => {
                    warn!("Page load failed: {}", detail);
                    dialog::offer_retry(&proxy, &detail);
                }
                UserEvent::RetryLoad => {
                    info!("Retrying {}", state.base_url());
                    window.set_title(&state.on_retry());
                    webview::load_url(&surface, state.base_url());
                    start_probe(&proxy, state.base_url(), load_timeout);
                }
                UserEvent::PushMessage(message) => state.on_push_message(&message),
            },
            _ => {}
        }
    })
}

fn start_probe(proxy: &EventLoopProxy<UserEvent>, url: &str, timeout: Duration) {
    let proxy = proxy.clone();
    probe::spawn_probe(url.to_string(), timeout, move |detail| {
        let _ = proxy.send_event(UserEvent::LoadFailed(detail));
    });
}
