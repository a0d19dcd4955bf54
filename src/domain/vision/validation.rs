//! Upload validation

use thiserror::Error;

/// Default upload ceiling (10 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors that reject an upload before any provider is called
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadValidationError {
    #[error("No image file provided")]
    MissingFile,

    #[error("File must be an image")]
    NotAnImage,

    #[error("Image file is empty")]
    Empty,

    #[error("Image too large (max {0}MB)")]
    TooLarge(usize),
}

/// Validate the declared content type of an upload
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), UploadValidationError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        _ => Err(UploadValidationError::NotAnImage),
    }
}

/// Validate the size of an upload against `max_bytes`
pub fn validate_size(len: usize, max_bytes: usize) -> Result<(), UploadValidationError> {
    if len == 0 {
        return Err(UploadValidationError::Empty);
    }

    if len > max_bytes {
        return Err(UploadValidationError::TooLarge(max_bytes / (1024 * 1024)));
    }

    Ok(())
}
