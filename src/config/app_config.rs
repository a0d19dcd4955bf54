use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::domain::usage::QuotaPolicy;
use crate::domain::vision::DEFAULT_MAX_UPLOAD_BYTES;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::vision::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_HUGGINGFACE_BASE_URL,
    DEFAULT_HUGGINGFACE_MODEL,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub quota: QuotaPolicy,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Locations of the JSON files backing usage counters and the catch log
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_usage_file")]
    pub usage_file: PathBuf,
    #[serde(default = "default_catches_file")]
    pub catches_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// Per-request timeout for provider calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(
        default = "ProviderEndpointConfig::gemini",
        deserialize_with = "deserialize_gemini"
    )]
    pub gemini: ProviderEndpointConfig,
    #[serde(
        default = "ProviderEndpointConfig::huggingface",
        deserialize_with = "deserialize_huggingface"
    )]
    pub huggingface: ProviderEndpointConfig,
}

/// Endpoint, model and credential source for one provider
#[derive(Debug, Clone)]
pub struct ProviderEndpointConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

/// Fields set in a provider section; unset ones keep that provider's defaults
#[derive(Debug, Deserialize)]
struct EndpointOverrides {
    base_url: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
}

impl EndpointOverrides {
    fn apply(self, defaults: ProviderEndpointConfig) -> ProviderEndpointConfig {
        ProviderEndpointConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            model: self.model.unwrap_or(defaults.model),
            api_key_env: self.api_key_env.unwrap_or(defaults.api_key_env),
        }
    }
}

fn deserialize_gemini<'de, D>(deserializer: D) -> Result<ProviderEndpointConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(EndpointOverrides::deserialize(deserializer)?.apply(ProviderEndpointConfig::gemini()))
}

fn deserialize_huggingface<'de, D>(deserializer: D) -> Result<ProviderEndpointConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(EndpointOverrides::deserialize(deserializer)?
        .apply(ProviderEndpointConfig::huggingface()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

fn default_usage_file() -> PathBuf {
    PathBuf::from("ai_usage.json")
}

fn default_catches_file() -> PathBuf {
    PathBuf::from("catches.json")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            usage_file: default_usage_file(),
            catches_file: default_catches_file(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            gemini: ProviderEndpointConfig::gemini(),
            huggingface: ProviderEndpointConfig::huggingface(),
        }
    }
}

impl ProviderEndpointConfig {
    fn gemini() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: "GOOGLE_AI_API_KEY".to_string(),
        }
    }

    fn huggingface() -> Self {
        Self {
            base_url: DEFAULT_HUGGINGFACE_BASE_URL.to_string(),
            model: DEFAULT_HUGGINGFACE_MODEL.to_string(),
            api_key_env: "HUGGINGFACE_API_KEY".to_string(),
        }
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(Self::environment())
    }

    /// Load the configuration, falling back to defaults.
    ///
    /// The load error is returned alongside so the caller can report it once
    /// logging is up.
    pub fn load_or_default() -> (Self, Option<config::ConfigError>) {
        match Self::load() {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(env: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(env)
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.quota.daily_limit, 1500);
        assert_eq!(config.quota.minute_limit, 15);
        assert_eq!(config.storage.usage_file, PathBuf::from("ai_usage.json"));
        assert_eq!(config.providers.timeout_secs, 30);
        assert_eq!(config.providers.gemini.api_key_env, "GOOGLE_AI_API_KEY");
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[quota]\nminute_limit = 5\n\n[providers.gemini]\nbase_url = \"http://localhost:9000\"\nmodel = \"gemini-test\"\napi_key_env = \"TEST_GEMINI_KEY\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.quota.minute_limit, 5);
        assert_eq!(config.quota.daily_limit, 1500);
        assert_eq!(config.providers.gemini.model, "gemini-test");
        assert_eq!(config.providers.huggingface.model, DEFAULT_HUGGINGFACE_MODEL);
        assert_eq!(config.server.port, 8000);
    }

    fn env_overrides(vars: &[(&str, &str)]) -> config::Environment {
        AppConfig::environment().source(Some(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_single_field_overrides_keep_other_sections() {
        let config = AppConfig::load_with_env(env_overrides(&[
            ("APP__SERVER__PORT", "9000"),
            ("APP__QUOTA__MINUTE_LIMIT", "5"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.quota.minute_limit, 5);
        assert_eq!(config.quota.daily_limit, 1500);
    }

    #[test]
    fn test_partial_logging_and_provider_overrides() {
        let config = AppConfig::load_with_env(env_overrides(&[
            ("APP__LOGGING__FORMAT", "json"),
            ("APP__PROVIDERS__GEMINI__MODEL", "gemini-2.0-flash"),
            ("APP__PROVIDERS__HUGGINGFACE__API_KEY_ENV", "HF_TOKEN"),
        ]))
        .unwrap();

        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.providers.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.providers.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.providers.gemini.api_key_env, "GOOGLE_AI_API_KEY");
        assert_eq!(config.providers.huggingface.api_key_env, "HF_TOKEN");
        assert_eq!(config.providers.huggingface.model, DEFAULT_HUGGINGFACE_MODEL);
    }

    #[test]
    fn test_unset_api_key_env() {
        let endpoint = ProviderEndpointConfig {
            base_url: "http://localhost".to_string(),
            model: "m".to_string(),
            api_key_env: "FISHCAST_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        };

        assert!(endpoint.api_key().is_none());
    }
}
