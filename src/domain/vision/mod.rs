//! Image analysis domain
//!
//! Provider trait, uploaded image payload, error taxonomy and response
//! classification shared by the primary and secondary providers.

mod error;
mod image;
mod prompt;
mod provider;
mod status;
mod validation;

pub use error::VisionError;
pub use image::ImagePayload;
pub use prompt::{enhance_caption, FISHING_SPOT_PROMPT};
pub use provider::VisionProvider;
pub use status::{error_detail, error_status, retry_delay_seconds, ProviderStatus};
pub use validation::{
    validate_content_type, validate_size, UploadValidationError, DEFAULT_MAX_UPLOAD_BYTES,
};

#[cfg(test)]
pub use provider::mock;
