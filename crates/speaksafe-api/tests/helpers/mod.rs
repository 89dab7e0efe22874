//! Test helpers: build AppState and router around an in-memory mail transport.
//!
//! Run from workspace root: `cargo test -p speaksafe-api --test relay_test`.

use async_trait::async_trait;
use axum_test::TestServer;
use speaksafe_api::setup::routes;
use speaksafe_api::{AppState, MailError, MailTransport, OutgoingMail};
use speaksafe_core::RelayConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock transport does with each mail.
#[derive(Clone)]
pub enum MockBehavior {
    Succeed,
    Fail { message: String, details: String },
    Hang(Duration),
}

/// Records every mail it is asked to send.
pub struct MockMailTransport {
    behavior: MockBehavior,
    sent: Mutex<Vec<OutgoingMail>>,
}

impl MockMailTransport {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        match &self.behavior {
            MockBehavior::Succeed => Ok(()),
            MockBehavior::Fail { message, details } => {
                Err(MailError::new(message.clone(), details.clone()))
            }
            MockBehavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
        }
    }
}

/// Relay configuration with test credentials plus the given overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> RelayConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SENDER_EMAIL".to_string(), "relay@company.com".to_string()),
        ("SENDER_PASSWORD".to_string(), "app-password".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    RelayConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<MockMailTransport>,
}

pub fn setup_test_app(behavior: MockBehavior) -> TestApp {
    setup_test_app_with_config(behavior, test_config(&[]))
}

pub fn setup_test_app_with_config(behavior: MockBehavior, config: RelayConfig) -> TestApp {
    let mailer = Arc::new(MockMailTransport::new(behavior));
    let state = Arc::new(AppState::new(config, mailer.clone()));
    let router = routes::setup_routes(state);
    let server = TestServer::new(router).expect("test server");
    TestApp { server, mailer }
}
