//! Error types module
//!
//! All relay and pipeline failures are unified under [`AppError`]. Each variant
//! belongs to one [`ErrorKind`] and self-describes its HTTP presentation through
//! [`ErrorMetadata`], so the API layer only has to render what the error says.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Discriminated error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Attachment rejected before processing (size or type).
    Validation,
    /// Image decode/re-encode failed.
    Sanitization,
    /// Relay request malformed or incomplete.
    Payload,
    /// Mail transport failed.
    Transport,
    /// Mail transport exceeded its deadline.
    Timeout,
    MethodNotAllowed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Sanitization => "sanitization",
            ErrorKind::Payload => "payload",
            ErrorKind::Transport => "transport",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MethodNotAllowed => "method_not_allowed",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MAIL_TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether resubmitting the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Optional technical detail shown next to the message
    fn details(&self) -> Option<String>;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File rejected: {0}")]
    Validation(String),

    #[error("Failed to sanitize file: {0}")]
    Sanitization(String),

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid attachment '{filename}': {reason}")]
    InvalidAttachment { filename: String, reason: String },

    #[error("Request body exceeds the {limit_mb} MB limit")]
    PayloadTooLarge { limit_mb: usize },

    #[error("Recipient not allowed: {0}")]
    RecipientNotAllowed(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    Transport { message: String, details: String },

    #[error("Mail transport timed out after {seconds}s")]
    TransportTimeout { seconds: u64 },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("Invalid JSON body: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "FILE_REJECTED", false, false, LogLevel::Debug),
        AppError::Sanitization(_) => (422, "SANITIZATION_FAILED", false, false, LogLevel::Warn),
        AppError::MissingFields(_) => (400, "MISSING_FIELDS", false, false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::InvalidAttachment { .. } => {
            (400, "INVALID_ATTACHMENT", false, false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge { .. } => {
            (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Warn)
        }
        AppError::RecipientNotAllowed(_) => {
            (400, "RECIPIENT_NOT_ALLOWED", false, false, LogLevel::Warn)
        }
        AppError::MethodNotAllowed => (405, "METHOD_NOT_ALLOWED", false, false, LogLevel::Debug),
        AppError::Transport { .. } => (500, "MAIL_TRANSPORT_ERROR", true, false, LogLevel::Error),
        AppError::TransportTimeout { .. } => (504, "MAIL_TIMEOUT", true, false, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, true, LogLevel::Error)
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Sanitization(_) => ErrorKind::Sanitization,
            AppError::MissingFields(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidAttachment { .. }
            | AppError::PayloadTooLarge { .. }
            | AppError::RecipientNotAllowed(_) => ErrorKind::Payload,
            AppError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            AppError::Transport { .. } => ErrorKind::Transport,
            AppError::TransportTimeout { .. } => ErrorKind::Timeout,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => ErrorKind::Internal,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Transport { message, .. } => message.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Failed to send email".to_string()
            }
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Transport { details, .. } => Some(details.clone()),
            AppError::InvalidAttachment { reason, .. } => Some(reason.clone()),
            AppError::InvalidInput(_)
            | AppError::Validation(_)
            | AppError::Sanitization(_)
            | AppError::RecipientNotAllowed(_) => None,
            AppError::MissingFields(_)
            | AppError::MethodNotAllowed
            | AppError::PayloadTooLarge { .. }
            | AppError::TransportTimeout { .. } => None,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                Some(self.detailed_message())
            }
        }
    }
}
