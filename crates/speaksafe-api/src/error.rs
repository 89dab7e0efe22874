//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; every `AppError`
//! renders as a `RelayResponse` with `success: false`, so callers always get
//! the same JSON shape back.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use speaksafe_core::models::RelayResponse;
use speaksafe_core::{AppError, ErrorMetadata, LogLevel};

static CACHED_IS_PRODUCTION: std::sync::LazyLock<bool> = std::sync::LazyLock::new(|| {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
});

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both the trait and AppError live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let kind = error.kind().as_str();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, kind, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, kind, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, kind, code, "Request failed");
        }
    }
}

/// Build the response body for an error.
///
/// Sensitive errors never carry technical details in production.
pub fn error_body(error: &AppError, is_production: bool) -> RelayResponse {
    let details = if is_production && error.is_sensitive() {
        None
    } else {
        error.details()
    };
    RelayResponse::failure(error.client_message(), details).with_code(error.error_code())
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, *CACHED_IS_PRODUCTION))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_keep_details() {
        let err = AppError::Transport {
            message: "SMTP timeout".to_string(),
            details: "connection timed out after 30s".to_string(),
        };
        let body = error_body(&err, true);
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("SMTP timeout"));
        assert_eq!(body.details.as_deref(), Some("connection timed out after 30s"));
        assert_eq!(body.code.as_deref(), Some("MAIL_TRANSPORT_ERROR"));
    }

    #[test]
    fn internal_details_hidden_in_production() {
        let err = AppError::Internal("mailer handle poisoned".to_string());
        assert!(error_body(&err, true).details.is_none());
        assert!(error_body(&err, false).details.is_some());
        assert_eq!(error_body(&err, true).error.as_deref(), Some("Failed to send email"));
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (
                AppError::MissingFields("to, subject, or body".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::TransportTimeout { seconds: 30 },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpAppError(err).into_response().status(), expected);
        }
    }
}
