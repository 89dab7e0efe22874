//! Helpers shared by the `speaksafe` command-line form.

use anyhow::Context;
use bytes::Bytes;
use speaksafe_core::models::{ProcessedAttachment, SanitizationLevel, UploadCandidate};
use speaksafe_processing::{content_type_for_extension, format_file_size};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Declared type for a file on disk, from its extension.
pub fn content_type_for_path(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Read files into upload candidates named after their file name.
pub async fn read_candidates(paths: &[PathBuf]) -> anyhow::Result<Vec<UploadCandidate>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        candidates.push(UploadCandidate::new(
            name,
            content_type_for_path(path),
            Bytes::from(data),
        ));
    }
    Ok(candidates)
}

/// One-line summary, e.g. `photo.jpg (image/jpeg, 1.5 KB) metadata removed`.
pub fn describe_attachment(attachment: &ProcessedAttachment) -> String {
    let status = match attachment.sanitization {
        SanitizationLevel::Reencoded => "metadata removed",
        SanitizationLevel::None => "forwarded unchanged",
    };
    format!(
        "{} ({}, {}) {}",
        attachment.name,
        attachment.content_type,
        format_file_size(attachment.size() as u64),
        status
    )
}

/// Name not yet in `taken`: `scan.png`, then `scan (2).png`, `scan (3).png`, ...
pub fn unique_file_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n = 2;
    loop {
        let candidate = match &extension {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
