//! Per-category metadata stripping.

use async_trait::async_trait;
use bytes::Bytes;
use speaksafe_core::models::{ProcessedAttachment, SanitizationLevel, UploadCandidate};
use speaksafe_core::AppError;
use uuid::Uuid;

use crate::category::FileCategory;
use crate::image::ImageProcessor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizationError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Sanitization task failed: {0}")]
    Task(String),
}

impl From<SanitizationError> for AppError {
    fn from(err: SanitizationError) -> Self {
        AppError::Sanitization(err.to_string())
    }
}

/// Payload produced by a sanitizer.
#[derive(Clone, Debug)]
pub struct Sanitized {
    pub payload: Bytes,
    pub content_type: String,
    pub level: SanitizationLevel,
}

#[async_trait]
pub trait Sanitizer: Send + Sync {
    async fn sanitize(&self, data: Bytes, content_type: &str) -> Result<Sanitized, SanitizationError>;
}

/// Re-rasterizes images so that only pixel data survives.
pub struct ImageSanitizer;

#[async_trait]
impl Sanitizer for ImageSanitizer {
    async fn sanitize(&self, data: Bytes, content_type: &str) -> Result<Sanitized, SanitizationError> {
        let declared = content_type.to_string();
        // Decode and encode are CPU-bound
        let image = tokio::task::spawn_blocking(move || {
            let had_exif = ImageProcessor::has_exif(&data);
            let image = ImageProcessor::reencode(&data, &declared)?;
            tracing::debug!(
                had_exif,
                dimensions = ?ImageProcessor::dimensions(&image.data),
                content_type = %image.content_type,
                "Image re-encoded"
            );
            Ok::<_, SanitizationError>(image)
        })
        .await
        .map_err(|e| SanitizationError::Task(e.to_string()))??;
        Ok(Sanitized {
            payload: Bytes::from(image.data),
            content_type: image.content_type,
            level: SanitizationLevel::Reencoded,
        })
    }
}

/// PDF and Office documents are forwarded byte-for-byte.
pub struct DocumentSanitizer;

#[async_trait]
impl Sanitizer for DocumentSanitizer {
    async fn sanitize(&self, data: Bytes, content_type: &str) -> Result<Sanitized, SanitizationError> {
        tracing::debug!(
            content_type = %content_type,
            size = data.len(),
            "Document metadata is not stripped; forwarding unchanged"
        );
        Ok(Sanitized {
            payload: data,
            content_type: content_type.to_string(),
            level: SanitizationLevel::None,
        })
    }
}

/// Audio, video and plain text pass through.
pub struct PassThroughSanitizer;

#[async_trait]
impl Sanitizer for PassThroughSanitizer {
    async fn sanitize(&self, data: Bytes, content_type: &str) -> Result<Sanitized, SanitizationError> {
        Ok(Sanitized {
            payload: data,
            content_type: content_type.to_string(),
            level: SanitizationLevel::None,
        })
    }
}

pub fn sanitizer_for(category: FileCategory) -> &'static dyn Sanitizer {
    match category {
        FileCategory::Image => &ImageSanitizer,
        FileCategory::Pdf | FileCategory::OfficeDocument => &DocumentSanitizer,
        FileCategory::Other => &PassThroughSanitizer,
    }
}

/// Strip embedded metadata from an already-validated candidate.
///
/// The result carries a fresh id, the original name and size, and records
/// whether the payload was actually re-encoded.
pub async fn strip_metadata(
    candidate: UploadCandidate,
) -> Result<ProcessedAttachment, SanitizationError> {
    let category = FileCategory::from_content_type(&candidate.content_type);
    let original_size = candidate.size();
    let sanitized = sanitizer_for(category)
        .sanitize(candidate.data, &candidate.content_type)
        .await?;

    tracing::debug!(
        file_name = %candidate.name,
        category = category.as_str(),
        original_size,
        processed_size = sanitized.payload.len(),
        "Attachment processed"
    );

    Ok(ProcessedAttachment {
        id: Uuid::new_v4(),
        name: candidate.name,
        original_size,
        content_type: sanitized.content_type,
        sanitization: sanitized.level,
        payload: sanitized.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use img_parts::jpeg::Jpeg;
    use img_parts::ImageEXIF;
    use std::io::Cursor;

    fn jpeg_bytes() -> Bytes {
        let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        Bytes::from(buffer)
    }

    #[tokio::test]
    async fn test_image_is_reencoded() {
        let candidate = UploadCandidate::new("photo.jpg", "image/jpeg", jpeg_bytes());
        let processed = strip_metadata(candidate).await.unwrap();
        assert_eq!(processed.name, "photo.jpg");
        assert_eq!(processed.content_type, "image/jpeg");
        assert_eq!(processed.sanitization, SanitizationLevel::Reencoded);
        assert!(!processed.payload.is_empty());
    }

    #[tokio::test]
    async fn test_image_exif_is_dropped() {
        let mut jpeg = Jpeg::from_bytes(jpeg_bytes()).unwrap();
        jpeg.set_exif(Some(Bytes::from_static(b"MM\x00\x2a\x00\x00\x00\x08\x00\x00\x00\x00\x00\x00")));
        let dirty = jpeg.encoder().bytes();
        assert!(ImageProcessor::has_exif(&dirty));

        let processed = strip_metadata(UploadCandidate::new("gps.jpg", "image/jpeg", dirty))
            .await
            .unwrap();
        assert!(!ImageProcessor::has_exif(&processed.payload));
        assert_eq!(ImageProcessor::dimensions(&processed.payload), Some((8, 8)));
    }

    #[tokio::test]
    async fn test_document_is_copied_verbatim() {
        let pdf = Bytes::from_static(b"%PDF-1.7\n/Author (Jane Doe)\n%%EOF");
        let candidate = UploadCandidate::new("report.pdf", "application/pdf", pdf.clone());
        let processed = strip_metadata(candidate).await.unwrap();
        assert_eq!(processed.payload, pdf);
        assert_eq!(processed.original_size, pdf.len());
        assert_eq!(processed.sanitization, SanitizationLevel::None);
    }

    #[tokio::test]
    async fn test_other_types_pass_through() {
        let text = Bytes::from_static(b"meeting notes");
        let candidate = UploadCandidate::new("notes.txt", "text/plain", text.clone());
        let processed = strip_metadata(candidate).await.unwrap();
        assert_eq!(processed.payload, text);
        assert_eq!(processed.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_undecodable_image_fails() {
        let candidate =
            UploadCandidate::new("broken.png", "image/png", Bytes::from_static(b"garbage"));
        let err = strip_metadata(candidate).await.unwrap_err();
        assert!(matches!(err, SanitizationError::Decode(_)));
    }

    #[tokio::test]
    async fn test_each_call_gets_a_fresh_id() {
        let a = strip_metadata(UploadCandidate::new("a.txt", "text/plain", Bytes::from_static(b"a")))
            .await
            .unwrap();
        let b = strip_metadata(UploadCandidate::new("a.txt", "text/plain", Bytes::from_static(b"a")))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
