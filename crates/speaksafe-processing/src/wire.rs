//! Base64 wire encoding of processed attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use speaksafe_core::models::{ProcessedAttachment, WireAttachment};
use speaksafe_core::AppError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Data URL is not base64-encoded")]
    MissingBase64Marker,

    #[error("Invalid base64 content: {0}")]
    InvalidBase64(String),
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

pub fn encode_for_wire(attachment: &ProcessedAttachment) -> WireAttachment {
    WireAttachment {
        filename: attachment.name.clone(),
        content: STANDARD.encode(&attachment.payload),
        content_type: attachment.content_type.clone(),
    }
}

/// Everything after the first comma of a data URL; other input is returned as-is.
pub fn strip_data_url_prefix(source: &str) -> &str {
    if source.starts_with("data:") {
        if let Some((_, rest)) = source.split_once(',') {
            return rest;
        }
    }
    source
}

/// Build a wire attachment from a `data:<type>;base64,<content>` URL.
pub fn encode_data_url(
    filename: &str,
    content_type: &str,
    data_url: &str,
) -> Result<WireAttachment, EncodeError> {
    let header = data_url.split_once(',').map(|(h, _)| h).unwrap_or("");
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(EncodeError::MissingBase64Marker);
    }

    let content = strip_data_url_prefix(data_url);
    STANDARD
        .decode(content)
        .map_err(|e| EncodeError::InvalidBase64(e.to_string()))?;

    Ok(WireAttachment {
        filename: filename.to_string(),
        content: content.to_string(),
        content_type: content_type.to_string(),
    })
}

pub fn decode_content(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use speaksafe_core::models::SanitizationLevel;
    use uuid::Uuid;

    fn processed(payload: &'static [u8]) -> ProcessedAttachment {
        ProcessedAttachment {
            id: Uuid::new_v4(),
            name: "evidence.pdf".to_string(),
            original_size: payload.len(),
            content_type: "application/pdf".to_string(),
            sanitization: SanitizationLevel::None,
            payload: Bytes::from_static(payload),
        }
    }

    #[test]
    fn encoded_content_decodes_to_payload() {
        let attachment = processed(b"%PDF-1.4 \x00\xff binary");
        let wire = encode_for_wire(&attachment);
        assert_eq!(wire.filename, "evidence.pdf");
        assert_eq!(wire.content_type, "application/pdf");
        assert_eq!(decode_content(&wire.content).unwrap(), attachment.payload.to_vec());
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBORw0KGgo="), "iVBORw0KGgo=");
        assert_eq!(strip_data_url_prefix("aGVsbG8="), "aGVsbG8=");
    }

    #[test]
    fn data_url_is_accepted() {
        let wire = encode_data_url("hello.txt", "text/plain", "data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(wire.content, "aGVsbG8=");
        assert_eq!(decode_content(&wire.content).unwrap(), b"hello");
    }

    #[test]
    fn data_url_without_base64_marker_fails() {
        assert_eq!(
            encode_data_url("a.txt", "text/plain", "data:text/plain,hello"),
            Err(EncodeError::MissingBase64Marker)
        );
        assert_eq!(
            encode_data_url("a.txt", "text/plain", "aGVsbG8="),
            Err(EncodeError::MissingBase64Marker)
        );
    }

    #[test]
    fn data_url_with_invalid_content_fails() {
        let result = encode_data_url("a.txt", "text/plain", "data:text/plain;base64,aGVs bG8=");
        assert!(matches!(result, Err(EncodeError::InvalidBase64(_))));
    }
}
