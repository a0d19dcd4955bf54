use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::http_client::HttpClient;
use super::{GeminiProvider, HuggingFaceProvider};
use crate::config::ProvidersConfig;
use crate::domain::{DomainError, VisionProvider};

/// Factory for creating vision providers
#[derive(Debug)]
pub struct VisionProviderFactory;

impl VisionProviderFactory {
    /// Create the quota-managed primary provider (Gemini).
    ///
    /// A missing API key does not fail startup; calls report a configuration
    /// error instead.
    pub fn create_primary(config: &ProvidersConfig) -> Result<Arc<dyn VisionProvider>, DomainError> {
        let endpoint = &config.gemini;
        let api_key = endpoint.api_key();

        if api_key.is_none() {
            warn!(env = %endpoint.api_key_env, "Gemini API key not set");
        }

        let provider = GeminiProvider::with_base_url(
            Self::http_client(config)?,
            api_key,
            &endpoint.base_url,
        )
        .with_model(&endpoint.model);

        Ok(Arc::new(provider))
    }

    /// Create the fallback provider (Hugging Face)
    pub fn create_secondary(
        config: &ProvidersConfig,
    ) -> Result<Arc<dyn VisionProvider>, DomainError> {
        let endpoint = &config.huggingface;
        let api_key = endpoint.api_key();

        if api_key.is_none() {
            warn!(env = %endpoint.api_key_env, "Hugging Face API key not set");
        }

        let provider = HuggingFaceProvider::with_base_url(
            Self::http_client(config)?,
            api_key,
            &endpoint.base_url,
        )
        .with_model(&endpoint.model);

        Ok(Arc::new(provider))
    }

    fn http_client(config: &ProvidersConfig) -> Result<HttpClient, DomainError> {
        HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))
    }
}
