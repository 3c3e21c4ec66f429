//! User-visible notification surface

use authshell_core::types::Notification;
use std::cell::RefCell;

/// Sink for user-visible notifications (native dialog, toast, test recorder)
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Notifier that keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.borrow_mut().push(notification.clone());
    }
}
