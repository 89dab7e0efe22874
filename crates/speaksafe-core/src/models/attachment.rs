//! Attachment models: from user selection to wire format.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-selected file before validation and processing.
#[derive(Clone, Debug)]
pub struct UploadCandidate {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// How much metadata removal was actually performed on a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizationLevel {
    /// Pixels were re-encoded into a fresh container; embedded metadata is gone.
    Reencoded,
    /// Bytes were copied verbatim; embedded metadata (author, revisions, GPS...) survives.
    None,
}

/// Output of the attachment pipeline, held client-side until submission.
#[derive(Clone, Debug)]
pub struct ProcessedAttachment {
    pub id: Uuid,
    pub name: String,
    /// Byte length of the file as selected.
    pub original_size: usize,
    pub content_type: String,
    pub sanitization: SanitizationLevel,
    pub payload: Bytes,
}

impl ProcessedAttachment {
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Attachment as serialized in the relay request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttachment {
    pub filename: String,
    /// Standard base64, no data-URL prefix.
    pub content: String,
    pub content_type: String,
}
