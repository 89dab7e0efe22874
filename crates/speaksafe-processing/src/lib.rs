//! SpeakSafe attachment pipeline
//!
//! Turns user-selected files into metadata-stripped, base64-encoded
//! attachments ready for the relay:
//! - `validator`: size ceiling and MIME allow-list
//! - `sanitizer`: per-category metadata stripping (images are re-encoded)
//! - `wire`: base64 and data-URL encoding
//! - `pipeline`: concurrent batch processing with per-file rejections
//! - `pending`: the set of attachments waiting for submission

pub mod category;
pub mod format;
pub mod image;
pub mod pending;
pub mod pipeline;
pub mod sanitizer;
pub mod validator;
pub mod wire;

pub use category::FileCategory;
pub use format::format_file_size;
pub use crate::image::{ImageProcessor, ReencodedImage};
pub use pending::PendingAttachments;
pub use pipeline::{AttachmentPipeline, BatchOutcome, FileRejection, RejectionReason};
pub use sanitizer::{strip_metadata, SanitizationError, Sanitizer};
pub use validator::{
    content_type_for_extension, AttachmentValidator, ValidationError, MAX_FILE_SIZE_BYTES,
};
pub use wire::{decode_content, encode_data_url, encode_for_wire, strip_data_url_prefix, EncodeError};
