use async_trait::async_trait;
use std::fmt::Debug;

use super::error::VisionError;
use super::image::ImagePayload;

/// Trait for image analysis providers (Gemini, Hugging Face)
#[async_trait]
pub trait VisionProvider: Send + Sync + Debug {
    /// Analyze the image as a fishing spot and return the generated text
    async fn analyze(&self, image: &ImagePayload) -> Result<String, VisionError>;

    /// Display name reported to clients
    fn provider_name(&self) -> &'static str;
}
