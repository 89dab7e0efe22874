//! Report submission relay.

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use speaksafe_core::models::{RelayResponse, WireAttachment};
use speaksafe_core::{AppError, RelayConfig};
use speaksafe_processing::decode_content;
use std::sync::Arc;
use validator::Validate;

use crate::error::HttpAppError;
use crate::services::{MailAttachment, OutgoingMail};
use crate::state::AppState;

/// Relay request body. Required fields are optional here so that an absent
/// field yields the same 400 as an empty one.
#[derive(Debug, Deserialize, Validate)]
pub struct RelayRequest {
    #[validate(email(message = "Recipient must be a valid email address"))]
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<WireAttachment>>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl RelayRequest {
    fn required_fields(&self) -> Result<(String, String, String), AppError> {
        match (present(&self.to), present(&self.subject), present(&self.body)) {
            (Some(to), Some(subject), Some(body)) => {
                Ok((to.trim().to_string(), subject.to_string(), body.to_string()))
            }
            _ => Err(AppError::MissingFields("to, subject, or body".to_string())),
        }
    }

    /// Required fields, with the trimmed recipient checked as an address.
    fn checked_fields(&mut self) -> Result<(String, String, String), AppError> {
        let fields = self.required_fields()?;
        self.to = Some(fields.0.clone());
        self.validate().map_err(AppError::from)?;
        Ok(fields)
    }
}

fn body_error(rejection: BytesRejection, limit_bytes: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            limit_mb: limit_bytes / (1024 * 1024),
        }
    } else {
        AppError::InvalidInput(rejection.body_text())
    }
}

fn decode_attachments(attachments: Vec<WireAttachment>) -> Result<Vec<MailAttachment>, AppError> {
    attachments
        .into_iter()
        .map(|attachment| {
            let data = decode_content(&attachment.content).map_err(|e| {
                AppError::InvalidAttachment {
                    filename: attachment.filename.clone(),
                    reason: format!("content is not valid base64: {}", e),
                }
            })?;
            Ok(MailAttachment {
                filename: attachment.filename,
                content_type: attachment.content_type,
                data: Bytes::from(data),
            })
        })
        .collect()
}

fn resolve_recipient(config: &RelayConfig, requested: String) -> Result<String, AppError> {
    if let Some(recipient) = &config.recipient_override {
        tracing::info!(
            requested = %requested,
            recipient = %recipient,
            "Recipient overridden by configuration"
        );
        return Ok(recipient.clone());
    }
    if !config.is_recipient_allowed(&requested) {
        return Err(AppError::RecipientNotAllowed(requested));
    }
    Ok(requested)
}

/// Accepts the report JSON, forwards it to the mail transport exactly once and
/// normalizes the outcome. `OPTIONS` is answered as a CORS preflight.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpAppError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed.into());
    }

    let body = body.map_err(|e| body_error(e, state.config.max_request_body_bytes))?;
    let mut request: RelayRequest = serde_json::from_slice(&body).map_err(AppError::from)?;
    let (to, subject, html_body) = request.checked_fields()?;

    let attachments = decode_attachments(request.attachments.unwrap_or_default())?;
    let to = resolve_recipient(&state.config, to)?;

    let attachment_count = attachments.len();
    let attachment_bytes: usize = attachments.iter().map(|a| a.data.len()).sum();
    let mail = OutgoingMail {
        to,
        subject,
        html_body,
        attachments,
    };

    let timeout = state.config.mail_timeout;
    match tokio::time::timeout(timeout, state.mailer.send(mail)).await {
        Ok(Ok(())) => {
            tracing::info!(attachment_count, attachment_bytes, "Report relayed");
            Ok((StatusCode::OK, Json(RelayResponse::sent())).into_response())
        }
        Ok(Err(err)) => Err(AppError::from(err).into()),
        Err(_) => Err(AppError::TransportTimeout {
            seconds: timeout.as_secs(),
        }
        .into()),
    }
}
