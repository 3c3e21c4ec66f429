//! Shell/page bridge: message channel, navigation classifier, injected shim

pub mod channel;
pub mod navigation;
pub mod notify;
pub mod push;
pub mod shim;
pub mod signin;

pub use channel::{ChannelOutcome, LoginSummary, MessageChannel};
pub use navigation::{AuthPatterns, NavigationClassifier, Transition};
pub use notify::{Notifier, RecordingNotifier};
pub use shim::{CompatibilityShim, FallbackPoll};
pub use signin::{IdentityProvider, MessageSink, RecordingSink, SignInController};

