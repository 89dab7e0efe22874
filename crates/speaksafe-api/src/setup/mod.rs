//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::services::SmtpMailTransport;
use crate::state::AppState;
use anyhow::{Context, Result};
use speaksafe_core::RelayConfig;
use std::sync::Arc;

/// Validate configuration, start tracing, build the mail transport and the router.
pub async fn initialize_app(config: RelayConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment,
        recipient_override = config.recipient_override.is_some(),
        allowed_recipients = config.allowed_recipients.as_ref().map_or(0, Vec::len),
        "Configuration loaded and validated successfully"
    );

    let mailer = SmtpMailTransport::from_config(&config)
        .context("Failed to initialize mail transport")?;
    let state = Arc::new(AppState::new(config, Arc::new(mailer)));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
