//! authshell core library
//!
//! Shared types, errors, and configuration for the shell container and
//! the bridge logic.

pub mod config;
pub mod error;
pub mod types;

pub use config::{MatchMode, ShellConfig};
pub use error::{AuthShellError, AuthShellResult};
