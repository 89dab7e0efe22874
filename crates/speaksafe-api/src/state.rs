//! Application state shared by all handlers.

use crate::services::MailTransport;
use speaksafe_core::RelayConfig;
use std::sync::Arc;

/// Read-only configuration plus the mail transport handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn new(config: RelayConfig, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
        }
    }
}
