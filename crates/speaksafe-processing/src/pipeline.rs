//! Attachment pipeline: validate, then strip metadata, for a batch of files.

use futures::future::join_all;
use speaksafe_core::models::{ProcessedAttachment, UploadCandidate};
use speaksafe_core::{AppError, ErrorMetadata, Notice};

use crate::sanitizer::{strip_metadata, SanitizationError};
use crate::validator::{AttachmentValidator, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sanitization(#[from] SanitizationError),
}

impl From<RejectionReason> for AppError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::Validation(err) => err.into(),
            RejectionReason::Sanitization(err) => err.into(),
        }
    }
}

/// A file that did not make it into the pending set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file_name: String,
    pub reason: RejectionReason,
}

impl FileRejection {
    pub fn notice(&self) -> Notice {
        match &self.reason {
            RejectionReason::Validation(err) => err.notice(&self.file_name),
            RejectionReason::Sanitization(_) => Notice::FileProcessingFailed {
                file_name: self.file_name.clone(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// In the order the files were selected.
    pub accepted: Vec<ProcessedAttachment>,
    pub rejected: Vec<FileRejection>,
}

#[derive(Clone, Debug, Default)]
pub struct AttachmentPipeline {
    validator: AttachmentValidator,
}

impl AttachmentPipeline {
    pub fn new(validator: AttachmentValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &AttachmentValidator {
        &self.validator
    }

    /// Validate and sanitize a single file.
    pub async fn process(
        &self,
        candidate: UploadCandidate,
    ) -> Result<ProcessedAttachment, FileRejection> {
        let file_name = candidate.name.clone();
        if let Err(err) = self.validator.validate(&candidate) {
            return Err(FileRejection {
                file_name,
                reason: err.into(),
            });
        }
        strip_metadata(candidate).await.map_err(|err| FileRejection {
            file_name,
            reason: err.into(),
        })
    }

    /// Process every file concurrently and wait for all of them before
    /// splitting successes from failures.
    pub async fn process_batch(&self, candidates: Vec<UploadCandidate>) -> BatchOutcome {
        let total = candidates.len();
        let results = join_all(candidates.into_iter().map(|c| self.process(c))).await;

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(attachment) => outcome.accepted.push(attachment),
                Err(rejection) => {
                    let error = AppError::from(rejection.reason.clone());
                    tracing::warn!(
                        file_name = %rejection.file_name,
                        kind = error.kind().as_str(),
                        code = error.error_code(),
                        error = %error,
                        "Attachment rejected"
                    );
                    outcome.rejected.push(rejection);
                }
            }
        }

        tracing::info!(
            total,
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            "Attachment batch processed"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::MAX_FILE_SIZE_BYTES;
    use bytes::Bytes;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png() -> Bytes {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer)
    }

    #[tokio::test]
    async fn test_batch_keeps_successes_in_order() {
        let pipeline = AttachmentPipeline::default();
        let candidates = vec![
            UploadCandidate::new("one.png", "image/png", png()),
            UploadCandidate::new("tool.exe", "application/x-msdownload", Bytes::from_static(b"MZ")),
            UploadCandidate::new("two.txt", "text/plain", Bytes::from_static(b"notes")),
            UploadCandidate::new(
                "huge.mp4",
                "video/mp4",
                Bytes::from(vec![0u8; MAX_FILE_SIZE_BYTES + 1]),
            ),
            UploadCandidate::new("broken.jpg", "image/jpeg", Bytes::from_static(b"nope")),
            UploadCandidate::new("three.pdf", "application/pdf", Bytes::from_static(b"%PDF")),
        ];

        let outcome = pipeline.process_batch(candidates).await;

        let names: Vec<_> = outcome.accepted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["one.png", "two.txt", "three.pdf"]);
        assert_eq!(outcome.rejected.len(), 3);
    }

    #[tokio::test]
    async fn test_rejections_map_to_notices() {
        let pipeline = AttachmentPipeline::default();
        let outcome = pipeline
            .process_batch(vec![
                UploadCandidate::new("tool.exe", "application/x-msdownload", Bytes::from_static(b"MZ")),
                UploadCandidate::new("broken.jpg", "image/jpeg", Bytes::from_static(b"nope")),
            ])
            .await;

        let notices: Vec<_> = outcome.rejected.iter().map(FileRejection::notice).collect();
        assert_eq!(
            notices,
            [
                Notice::FileTypeNotAllowed {
                    file_name: "tool.exe".into()
                },
                Notice::FileProcessingFailed {
                    file_name: "broken.jpg".into()
                },
            ]
        );
    }

    #[test]
    fn test_rejection_reasons_carry_error_codes() {
        let too_large = AppError::from(RejectionReason::Validation(ValidationError::FileTooLarge {
            size: 11,
            max: 10,
        }));
        assert_eq!(too_large.error_code(), "FILE_REJECTED");
        assert!(too_large.to_string().contains("File too large"));

        let undecodable = AppError::from(RejectionReason::Sanitization(SanitizationError::Decode(
            "bad header".to_string(),
        )));
        assert_eq!(undecodable.error_code(), "SANITIZATION_FAILED");
        assert_eq!(undecodable.http_status_code(), 422);
    }

    #[tokio::test]
    async fn test_custom_validator_limit_applies() {
        let pipeline = AttachmentPipeline::new(AttachmentValidator::new(
            4,
            vec!["text/".to_string()],
            Vec::new(),
        ));
        assert_eq!(pipeline.validator().max_file_size(), 4);
        assert_eq!(
            AttachmentPipeline::default().validator().max_file_size(),
            MAX_FILE_SIZE_BYTES
        );

        let outcome = pipeline
            .process_batch(vec![
                UploadCandidate::new("a.txt", "text/plain", Bytes::from_static(b"abcd")),
                UploadCandidate::new("b.txt", "text/plain", Bytes::from_static(b"abcde")),
            ])
            .await;
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected[0].file_name, "b.txt");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcome = AttachmentPipeline::default().process_batch(Vec::new()).await;
        assert!(outcome.accepted.is_empty());
        assert!(outcome.rejected.is_empty());
    }
}
