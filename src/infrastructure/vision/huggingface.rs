use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::http_client::HttpClientTrait;
use crate::domain::vision::{enhance_caption, error_detail, ImagePayload, VisionError, VisionProvider};

pub const HUGGINGFACE_PROVIDER_NAME: &str = "Hugging Face";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "Salesforce/blip-image-captioning-large";

/// Hugging Face inference API image captioning provider
#[derive(Debug)]
pub struct HuggingFaceProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> HuggingFaceProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_HUGGINGFACE_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: api_key
                .filter(|key| !key.trim().is_empty())
                .map(|key| format!("Bearer {}", key)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_HUGGINGFACE_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    fn parse_response(&self, body: &Value) -> Result<String, VisionError> {
        body.pointer("/0/generated_text")
            .and_then(Value::as_str)
            .map(|caption| enhance_caption(caption.trim()))
            .ok_or_else(|| VisionError::unexpected_shape(HUGGINGFACE_PROVIDER_NAME))
    }

    fn classify_failure(&self, status: u16, body: &Value) -> VisionError {
        let detail = error_detail(body);

        match status {
            503 => VisionError::unavailable(
                HUGGINGFACE_PROVIDER_NAME,
                status,
                format!("Model is loading, please try again shortly ({})", detail),
                estimated_time_seconds(body),
            ),
            429 => VisionError::quota_exhausted(HUGGINGFACE_PROVIDER_NAME, detail, None),
            400..=499 => VisionError::rejected(HUGGINGFACE_PROVIDER_NAME, status, detail),
            _ => VisionError::unavailable(HUGGINGFACE_PROVIDER_NAME, status, detail, None),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> VisionProvider for HuggingFaceProvider<C> {
    async fn analyze(&self, image: &ImagePayload) -> Result<String, VisionError> {
        let auth_header = self.auth_header.as_deref().ok_or_else(|| {
            VisionError::configuration(HUGGINGFACE_PROVIDER_NAME, "API key not configured")
        })?;

        debug!(model = %self.model, bytes = image.len(), "Calling Hugging Face");

        let response = self
            .client
            .post_bytes(
                &self.model_url(),
                vec![
                    ("Authorization", auth_header),
                    ("Content-Type", image.content_type()),
                ],
                image.bytes().clone(),
            )
            .await
            .map_err(|e| VisionError::transient(HUGGINGFACE_PROVIDER_NAME, e.to_string()))?;

        if response.is_success() {
            return self.parse_response(&response.body);
        }

        let error = self.classify_failure(response.status, &response.body);
        warn!(status = response.status, code = error.code(), "Hugging Face call failed");

        Err(error)
    }

    fn provider_name(&self) -> &'static str {
        HUGGINGFACE_PROVIDER_NAME
    }
}

/// Model warm-up estimate from a 503 body, rounded up to whole seconds
fn estimated_time_seconds(body: &Value) -> Option<u64> {
    body.get("estimated_time")
        .and_then(Value::as_f64)
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.ceil() as u64)
}
