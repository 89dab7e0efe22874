//! Sanitization category of an accepted attachment.

use crate::validator::normalize_content_type;

/// Closed set of sanitization strategies, selected from the declared MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Pdf,
    OfficeDocument,
    Other,
}

const OFFICE_DOCUMENT_TYPES: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

impl FileCategory {
    pub fn from_content_type(content_type: &str) -> Self {
        let normalized = normalize_content_type(content_type);
        if normalized.starts_with("image/") {
            FileCategory::Image
        } else if normalized == "application/pdf" {
            FileCategory::Pdf
        } else if OFFICE_DOCUMENT_TYPES.contains(&normalized.as_str()) {
            FileCategory::OfficeDocument
        } else {
            FileCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Pdf => "pdf",
            FileCategory::OfficeDocument => "office_document",
            FileCategory::Other => "other",
        }
    }
}
