//! Native message dialogs
//!
//! Dialogs run on their own thread so the event loop keeps processing
//! navigation and channel events while one is open. Answers come back to the
//! loop as `UserEvent`s.

use crate::UserEvent;
use authshell_bridge::Notifier;
use authshell_core::types::Notification;
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use tao::event_loop::EventLoopProxy;

/// Shows each notification as a dialog with a single OK button
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn notify(&self, notification: &Notification) {
        let Notification { title, body } = notification.clone();
        spawn_dialog("notification", move || {
            let dialog = AsyncMessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_title(title.as_str())
                .set_description(body.as_str())
                .set_buttons(MessageButtons::Ok);
            pollster::block_on(dialog.show());
        });
    }
}

/// Tell the user the page failed to load. Sends `UserEvent::RetryLoad` if
/// they ask to retry.
pub fn offer_retry(proxy: &EventLoopProxy<UserEvent>, detail: &str) {
    let description = format!("Failed to load the web page.\n\n{}\n\nTry again?", detail);
    let proxy = proxy.clone();
    spawn_dialog("retry", move || {
        let dialog = AsyncMessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Error")
            .set_description(description)
            .set_buttons(MessageButtons::YesNo);
        if matches!(pollster::block_on(dialog.show()), MessageDialogResult::Yes) {
            let _ = proxy.send_event(UserEvent::RetryLoad);
        }
    });
}

fn spawn_dialog<F>(kind: &str, show: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Err(e) = std::thread::Builder::new()
        .name(format!("{}-dialog", kind))
        .spawn(show)
    {
        tracing::error!("Failed to show {} dialog: {}", kind, e);
    }
}
