//! HTTP client for the SpeakSafe relay.
//!
//! Posts an assembled `ReportPayload` as JSON and decodes the relay's
//! `RelayResponse`, whatever the status code.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use speaksafe_core::models::{RelayResponse, ReportPayload};
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:4000/api/send-email";

#[derive(Clone, Debug)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create client from environment: SPEAKSAFE_RELAY_URL.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("SPEAKSAFE_RELAY_URL")
            .unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a report. Returns the relay's response for both outcomes; an
    /// `Err` means the relay could not be reached or answered with something
    /// other than a relay response.
    pub async fn submit(&self, payload: &ReportPayload) -> Result<RelayResponse> {
        tracing::debug!(
            endpoint = %self.endpoint,
            attachments = payload.attachments.len(),
            "Submitting report"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read relay response")?;

        interpret_response(status, &text)
    }
}

/// Decode a relay answer. Bodies that are not a `RelayResponse` become errors.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<RelayResponse> {
    match serde_json::from_str::<RelayResponse>(body) {
        Ok(response) => {
            if response.success != status.is_success() {
                tracing::warn!(
                    status = %status,
                    success = response.success,
                    "Relay status and response body disagree"
                );
            }
            Ok(response)
        }
        Err(_) => Err(anyhow::anyhow!(
            "Relay request failed with status {}: {}",
            status,
            body
        )),
    }
}
