//! Outgoing mail: the transport seam and its SMTP implementation.

use async_trait::async_trait;
use bytes::Bytes;
use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use speaksafe_core::{AppError, RelayConfig};

/// Decoded attachment ready to be placed in a MIME part.
#[derive(Clone, Debug)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// One report email. The sender is not part of it; transports own their identity.
#[derive(Clone, Debug)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<MailAttachment>,
}

/// Transport failure: a short message for the caller and the underlying detail.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct MailError {
    pub message: String,
    pub details: String,
}

impl MailError {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: details.into(),
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Transport {
            message: err.message,
            details: err.details,
        }
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP transport authenticated with the relay's own sender credentials.
#[derive(Clone)]
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn from_config(config: &RelayConfig) -> Result<Self, anyhow::Error> {
        let from: Mailbox = config
            .sender_email
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SENDER_EMAIL: {}", e))?;
        let credentials =
            Credentials::new(config.sender_email.clone(), config.sender_password.clone());
        let host = config.smtp_host.as_str();
        let port = config.smtp_port;

        let mailer = if config.smtp_tls {
            let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                .port(port)
                .credentials(credentials)
                .timeout(Some(config.mail_timeout))
                .build();
            tracing::info!(host = %host, port, "Mail transport initialized (SMTP with STARTTLS)");
            mailer
        } else {
            let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .credentials(credentials)
                .timeout(Some(config.mail_timeout))
                .build();
            tracing::warn!(host = %host, port, "Mail transport initialized without TLS");
            mailer
        };

        Ok(Self { mailer, from })
    }
}

/// Assemble the MIME message: an HTML part followed by one part per attachment.
pub fn build_message(from: Mailbox, mail: OutgoingMail) -> Result<Message, MailError> {
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|e| MailError::new("Invalid recipient address", format!("{}", e)))?;

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::html(mail.html_body));
    for attachment in mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .or_else(|_| ContentType::parse("application/octet-stream"))
            .map_err(|e| MailError::new("Invalid attachment content type", e.to_string()))?;
        let body = Body::new_with_encoding(attachment.data.to_vec(), ContentTransferEncoding::Base64)
            .map_err(|_| {
                MailError::new(
                    "Failed to encode attachment",
                    format!("attachment '{}' could not be base64-encoded", attachment.filename),
                )
            })?;
        multipart = multipart.singlepart(Attachment::new(attachment.filename).body(body, content_type));
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject)
        .multipart(multipart)
        .map_err(|e| MailError::new("Failed to build email", e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let attachment_count = mail.attachments.len();
        let message = build_message(self.from.clone(), mail)?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| MailError::new(e.to_string(), format!("{:?}", e)))?;

        tracing::info!(attachment_count, "Report email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: "compliance@company.com".to_string(),
            subject: "[CONFIDENTIAL] Whistleblower Report - Finance".to_string(),
            html_body: "<div>report</div>".to_string(),
            attachments: vec![MailAttachment {
                filename: "ledger.csv".to_string(),
                content_type: "text/csv".to_string(),
                data: Bytes::from_static(b"date,amount\n2026-01-01,100\n"),
            }],
        }
    }

    #[test]
    fn builds_multipart_message_with_attachment() {
        let from: Mailbox = "relay@company.com".parse().unwrap();
        let message = build_message(from, mail()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: compliance@company.com"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("filename=\"ledger.csv\""));
        assert!(raw.contains("Content-Transfer-Encoding: base64"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let from: Mailbox = "relay@company.com".parse().unwrap();
        let mut mail = mail();
        mail.to = "not an address".to_string();
        let err = build_message(from, mail).unwrap_err();
        assert_eq!(err.message, "Invalid recipient address");
    }

    #[test]
    fn unknown_content_type_falls_back_to_octet_stream() {
        let from: Mailbox = "relay@company.com".parse().unwrap();
        let mut mail = mail();
        mail.attachments[0].content_type = "definitely not a mime type".to_string();
        let raw = String::from_utf8(build_message(from, mail).unwrap().formatted()).unwrap();
        assert!(raw.contains("application/octet-stream"));
    }

    #[test]
    fn mail_error_maps_to_transport_error() {
        let err: AppError = MailError::new("SMTP timeout", "timed out").into();
        assert!(matches!(err, AppError::Transport { .. }));
        assert_eq!(err.to_string(), "SMTP timeout");
    }
}
