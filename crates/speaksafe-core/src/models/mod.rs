//! Domain models shared by the pipeline, the relay and its clients.

pub mod attachment;
pub mod department;
pub mod report;

pub use attachment::{ProcessedAttachment, SanitizationLevel, UploadCandidate, WireAttachment};
pub use department::{Department, DepartmentDirectory, Language};
pub use report::{RelayResponse, ReportForm, ReportPayload};
