//! SpeakSafe Core Library
//!
//! Domain models, error types, configuration and report rendering shared by
//! the attachment pipeline, the mail relay and the command-line client.

pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod template;

// Re-export commonly used types
pub use config::RelayConfig;
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
pub use i18n::Notice;
