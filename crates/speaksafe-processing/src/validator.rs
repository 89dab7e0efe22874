use speaksafe_core::models::UploadCandidate;
use speaksafe_core::{AppError, Notice};

/// Per-file size ceiling: 10 MiB.
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Category prefixes accepted regardless of subtype.
pub const ALLOWED_CATEGORY_PREFIXES: &[&str] = &["image/", "video/", "audio/"];

/// Exact document and text types accepted in addition to the category prefixes.
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
];

/// Attachment validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("File type not allowed: {content_type}")]
    InvalidContentType { content_type: String },
}

impl ValidationError {
    /// Localized notice naming the rejected file.
    pub fn notice(&self, file_name: &str) -> Notice {
        let file_name = file_name.to_string();
        match self {
            ValidationError::FileTooLarge { .. } => Notice::FileTooLarge { file_name },
            ValidationError::InvalidContentType { .. } => Notice::FileTypeNotAllowed { file_name },
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Lowercased MIME type without parameters (`Text/Plain; charset=utf-8` → `text/plain`).
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Attachment validator
///
/// Classifies a candidate as accepted or rejected; it never panics and never
/// touches file contents, only the declared type and the byte length.
#[derive(Clone, Debug)]
pub struct AttachmentValidator {
    max_file_size: usize,
    allowed_prefixes: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl Default for AttachmentValidator {
    fn default() -> Self {
        Self::new(
            MAX_FILE_SIZE_BYTES,
            ALLOWED_CATEGORY_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ALLOWED_DOCUMENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl AttachmentValidator {
    pub fn new(
        max_file_size: usize,
        allowed_prefixes: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_prefixes,
            allowed_content_types,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate content type against the category prefixes and the exact allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);

        let by_category = self
            .allowed_prefixes
            .iter()
            .any(|prefix| normalized.starts_with(prefix.as_str()) && normalized.len() > prefix.len());
        let by_exact = self.allowed_content_types.iter().any(|ct| *ct == normalized);

        if !by_category && !by_exact {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate size first, then type.
    pub fn validate_all(&self, content_type: &str, file_size: usize) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }

    pub fn validate(&self, candidate: &UploadCandidate) -> Result<(), ValidationError> {
        self.validate_all(&candidate.content_type, candidate.size())
    }
}

/// Canonical MIME type for a file extension.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.trim_start_matches('.').to_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        // Videos
        "mp4" => "video/mp4",
        "mpeg" | "mpg" => "video/mpeg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/x-m4a",
        "aac" => "audio/aac",
        // Documents
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(content_type)
}
