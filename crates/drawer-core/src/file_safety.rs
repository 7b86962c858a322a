//! Upload validation: MIME allow-listing and size caps.
//!
//! Validation is declared-type only — no content sniffing. The allow
//! list covers the document formats the extraction model accepts.

use crate::defaults::{ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES};

/// Result of upload validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub allowed: bool,
    pub block_reason: Option<String>,
}

impl ValidationResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            block_reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            block_reason: Some(reason.into()),
        }
    }
}

/// Validate an upload's declared MIME type and size.
pub fn validate_upload(mime_type: &str, size: u64) -> ValidationResult {
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return ValidationResult::blocked(
            "Invalid file type. Only PDF, PNG, JPG, and WEBP are allowed.",
        );
    }
    if size > MAX_UPLOAD_BYTES {
        return ValidationResult::blocked(format!(
            "File exceeds maximum size of {} bytes",
            MAX_UPLOAD_BYTES
        ));
    }
    ValidationResult::allowed()
}

/// Lower-cased extension of an uploaded filename, stripped of anything
/// that is not alphanumeric. Used when generating stored file names;
/// never trusts path separators in client-supplied names.
pub fn safe_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
