//! Report form, relay request payload and relay response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attachment::WireAttachment;
use super::department::{Department, DepartmentDirectory, Language};
use crate::error::AppError;
use crate::template;

/// Fields collected by the report form. Identity fields are optional.
#[derive(Clone, Debug, Default)]
pub struct ReportForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub site: Option<String>,
    pub department: Option<Department>,
    pub message: String,
}

/// Relay request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<WireAttachment>,
}

impl ReportPayload {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        attachments: Vec<WireAttachment>,
    ) -> Result<Self, AppError> {
        let payload = Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachments,
        };
        let missing: Vec<&str> = [
            ("to", &payload.to),
            ("subject", &payload.subject),
            ("body", &payload.body),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing.join(", ")));
        }
        Ok(payload)
    }

    /// Resolve the recipient, render subject and body, and attach the encoded files.
    ///
    /// Fails before any network activity when the department is missing or has
    /// no configured address.
    pub fn assemble(
        form: &ReportForm,
        language: Language,
        directory: &DepartmentDirectory,
        attachments: Vec<WireAttachment>,
        received_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let department = form
            .department
            .ok_or_else(|| AppError::MissingFields("department".to_string()))?;
        if form.message.trim().is_empty() {
            return Err(AppError::MissingFields("message".to_string()));
        }
        let to = directory.address_for(department).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No address configured for department '{}'",
                department
            ))
        })?;

        let subject = template::report_subject(Some(department), language);
        let body = template::report_body(form, language, received_at);
        Self::new(to, subject, body, attachments)
    }
}

/// Normalized relay result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RelayResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: Some("Email sent successfully".to_string()),
            error: None,
            details: None,
            code: None,
        }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            details,
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Error text for display, falling back to a generic message.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Failed to send email")
    }
}
