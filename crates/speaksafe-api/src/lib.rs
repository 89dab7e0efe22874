//! SpeakSafe relay
//!
//! HTTP endpoint that takes an assembled report, decodes its attachments and
//! hands it to the mail transport once.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::HttpAppError;
pub use handlers::send_email::RelayRequest;
pub use services::{MailAttachment, MailError, MailTransport, OutgoingMail, SmtpMailTransport};
pub use state::AppState;
