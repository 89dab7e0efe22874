pub mod mail;

pub use mail::{MailAttachment, MailError, MailTransport, OutgoingMail, SmtpMailTransport};
