use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::http_client::{HttpClientTrait, HttpError};
use crate::domain::vision::{
    error_detail, retry_delay_seconds, ImagePayload, ProviderStatus, VisionError, VisionProvider,
    FISHING_SPOT_PROMPT,
};

pub const GEMINI_PROVIDER_NAME: &str = "Google Gemini";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const TEMPERATURE: f64 = 0.7;
const TOP_K: u32 = 32;
const TOP_P: f64 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Google Gemini `generateContent` provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, image: &ImagePayload) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": FISHING_SPOT_PROMPT },
                    {
                        "inline_data": {
                            "mime_type": image.content_type(),
                            "data": image.to_base64(),
                        }
                    }
                ]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "topK": TOP_K,
                "topP": TOP_P,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            }
        })
    }

    fn parse_response(&self, body: &Value) -> Result<String, VisionError> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| VisionError::unexpected_shape(GEMINI_PROVIDER_NAME))
    }

    fn classify_failure(&self, status: u16, body: &Value) -> VisionError {
        let detail = error_detail(body);

        match ProviderStatus::classify(status, body) {
            ProviderStatus::QuotaExceeded | ProviderStatus::RateLimited => {
                VisionError::quota_exhausted(GEMINI_PROVIDER_NAME, detail, retry_delay_seconds(body))
            }
            ProviderStatus::BadRequest => VisionError::rejected(GEMINI_PROVIDER_NAME, status, detail),
            ProviderStatus::Unknown | ProviderStatus::Success => VisionError::unavailable(
                GEMINI_PROVIDER_NAME,
                status,
                detail,
                retry_delay_seconds(body),
            ),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> VisionProvider for GeminiProvider<C> {
    async fn analyze(&self, image: &ImagePayload) -> Result<String, VisionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            VisionError::configuration(GEMINI_PROVIDER_NAME, "API key not configured")
        })?;

        let url = self.generate_content_url();
        let body = self.build_request(image);

        debug!(model = %self.model, bytes = image.len(), "Calling Gemini");

        let response = self
            .client
            .post_json(
                &url,
                vec![
                    ("x-goog-api-key", api_key),
                    ("Content-Type", "application/json"),
                ],
                &body,
            )
            .await
            .map_err(|e| transport_error(&e))?;

        if response.is_success() {
            return self.parse_response(&response.body);
        }

        let error = self.classify_failure(response.status, &response.body);
        warn!(status = response.status, code = error.code(), "Gemini call failed");

        Err(error)
    }

    fn provider_name(&self) -> &'static str {
        GEMINI_PROVIDER_NAME
    }
}

fn transport_error(error: &HttpError) -> VisionError {
    VisionError::transient(GEMINI_PROVIDER_NAME, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vision::http_client::mock::MockHttpClient;
    use crate::infrastructure::vision::http_client::HttpClient;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

    fn image() -> ImagePayload {
        ImagePayload::new(vec![0xFFu8, 0xD8, 0xFF], "image/jpeg").with_filename("lake.jpg")
    }

    fn success_body(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn test_gemini_analyze() {
        let client = MockHttpClient::new().with_response(TEST_URL, 200, success_body("Cast near the reeds"));
        let provider = GeminiProvider::new(client, Some("test-key".to_string()));

        let text = provider.analyze(&image()).await.unwrap();

        assert_eq!(text, "Cast near the reeds");
    }

    #[tokio::test]
    async fn test_gemini_request_shape() {
        let client = MockHttpClient::new().with_response(TEST_URL, 200, success_body("ok"));
        let provider = GeminiProvider::new(client, Some("test-key".to_string()));

        provider.analyze(&image()).await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert!(request
            .headers
            .contains(&("x-goog-api-key".to_string(), "test-key".to_string())));

        let body = request.json.as_ref().unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], FISHING_SPOT_PROMPT);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9j/");
        assert_eq!(body["generationConfig"]["topK"], 32);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[tokio::test]
    async fn test_gemini_missing_key() {
        let provider = GeminiProvider::new(MockHttpClient::new(), None);

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err.code(), "configuration_error");
        assert!(provider.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_gemini_blank_key_is_missing() {
        let provider = GeminiProvider::new(MockHttpClient::new(), Some("  ".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err.code(), "configuration_error");
    }

    #[tokio::test]
    async fn test_gemini_resource_exhausted_is_quota() {
        let body = json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded for metric generate_content_requests",
                "status": "RESOURCE_EXHAUSTED",
                "details": [{
                    "@type": "type.googleapis.com/google.rpc.RetryInfo",
                    "retryDelay": "34s"
                }]
            }
        });
        let client = MockHttpClient::new().with_response(TEST_URL, 429, body);
        let provider = GeminiProvider::new(client, Some("k".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert!(err.is_quota());
        assert_eq!(err.retry_after_seconds(), Some(34));
    }

    #[tokio::test]
    async fn test_gemini_bad_request_is_rejected() {
        let body = json!({"error": {"code": 400, "message": "Invalid image", "status": "INVALID_ARGUMENT"}});
        let client = MockHttpClient::new().with_response(TEST_URL, 400, body);
        let provider = GeminiProvider::new(client, Some("k".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err, VisionError::rejected(GEMINI_PROVIDER_NAME, 400, "Invalid image"));
        assert_eq!(err.to_string(), "API Error (400): Invalid image");
    }

    #[tokio::test]
    async fn test_gemini_server_error_is_unavailable() {
        let client = MockHttpClient::new().with_response(TEST_URL, 500, json!({"error": "boom"}));
        let provider = GeminiProvider::new(client, Some("k".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err.code(), "provider_unavailable");
    }

    #[tokio::test]
    async fn test_gemini_missing_candidates() {
        let client = MockHttpClient::new().with_response(TEST_URL, 200, json!({"candidates": []}));
        let provider = GeminiProvider::new(client, Some("k".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err, VisionError::unexpected_shape(GEMINI_PROVIDER_NAME));
    }

    #[tokio::test]
    async fn test_gemini_timeout_is_transient() {
        let client = MockHttpClient::new().with_error(TEST_URL, HttpError::Timeout);
        let provider = GeminiProvider::new(client, Some("k".to_string()));

        let err = provider.analyze(&image()).await.unwrap_err();

        assert_eq!(err.code(), "network_error");
    }

    #[tokio::test]
    async fn test_gemini_against_http_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "live-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Try a spinnerbait")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_base_url(
            HttpClient::new(),
            Some("live-key".to_string()),
            server.uri(),
        )
        .with_model("gemini-test");

        let text = provider.analyze(&image()).await.unwrap();

        assert_eq!(text, "Try a spinnerbait");
    }
}
