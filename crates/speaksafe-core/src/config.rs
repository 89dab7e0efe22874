//! Configuration module
//!
//! Relay configuration is process-wide, read once from the environment at
//! startup and never mutated afterwards. Sender credentials live here and only
//! here; nothing in a request can override them.

use std::env;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 4000;
const SMTP_HOST: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;
const MAIL_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_BODY_MB: usize = 50;

/// Relay configuration.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub server_port: u16,
    pub environment: String,
    // Sender identity
    pub sender_email: String,
    pub sender_password: String,
    // SMTP transport
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: bool,
    pub mail_timeout: Duration,
    pub max_request_body_bytes: usize,
    /// Deployment-specific redirect of every report to a single mailbox.
    pub recipient_override: Option<String>,
    /// When set, only these recipients are accepted.
    pub allowed_recipients: Option<Vec<String>>,
}

impl RelayConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |primary: &str, legacy: &str| -> Option<String> {
            lookup(primary)
                .or_else(|| lookup(legacy))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = var("ENVIRONMENT", "APP_ENV").unwrap_or_else(|| "development".into());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let sender_email = var("SENDER_EMAIL", "SENDEREMAIL").ok_or_else(|| {
            anyhow::anyhow!("SENDER_EMAIL (or SENDEREMAIL) must be set for the mail relay")
        })?;
        let sender_password = var("SENDER_PASSWORD", "SENDERPASSWORD").ok_or_else(|| {
            anyhow::anyhow!("SENDER_PASSWORD (or SENDERPASSWORD) must be set for the mail relay")
        })?;

        let smtp_host = var("SMTP_HOST", "SMTP_SERVER").unwrap_or_else(|| SMTP_HOST.to_string());
        let smtp_port = lookup("SMTP_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(SMTP_PORT);
        let smtp_tls = lookup("SMTP_TLS")
            .map(|s| !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let mail_timeout_secs = lookup("MAIL_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(MAIL_TIMEOUT_SECS);

        let max_request_body_mb = lookup("MAX_REQUEST_BODY_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_REQUEST_BODY_MB);

        let max_request_body_bytes = max_request_body_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_REQUEST_BODY_MB is too large"))?;

        let allowed_recipients = lookup("ALLOWED_RECIPIENTS")
            .map(|s| {
                s.split(',')
                    .map(|r| r.trim().to_lowercase())
                    .filter(|r| !r.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty());

        Ok(Self {
            server_port,
            environment,
            sender_email,
            sender_password,
            smtp_host,
            smtp_port,
            smtp_tls,
            mail_timeout: Duration::from_secs(mail_timeout_secs),
            max_request_body_bytes,
            recipient_override: var("RECIPIENT_OVERRIDE", "TEST_RECIPIENT"),
            allowed_recipients,
        })
    }

    /// Check if the relay is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.sender_email.contains('@') {
            return Err(anyhow::anyhow!(
                "SENDER_EMAIL must be a valid email address"
            ));
        }

        if self.mail_timeout.is_zero() {
            return Err(anyhow::anyhow!("MAIL_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_BODY_MB must be greater than 0"));
        }

        if let Some(to) = &self.recipient_override {
            if !to.contains('@') {
                return Err(anyhow::anyhow!(
                    "RECIPIENT_OVERRIDE must be a valid email address"
                ));
            }
        }

        Ok(())
    }

    /// Whether `recipient` may receive reports under the current allow-list.
    pub fn is_recipient_allowed(&self, recipient: &str) -> bool {
        match &self.allowed_recipients {
            Some(list) => {
                let normalized = recipient.trim().to_lowercase();
                list.iter().any(|r| *r == normalized)
            }
            None => true,
        }
    }
}
