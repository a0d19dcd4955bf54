//! Vision provider error types

use thiserror::Error;

/// Failures of a vision provider call, classified for routing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisionError {
    #[error("{provider} is not configured: {message}")]
    Configuration { provider: String, message: String },

    #[error("Usage limit reached: {message}")]
    QuotaExhausted {
        provider: String,
        message: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("API Error ({status}): {detail}")]
    Rejected {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("{provider} is temporarily unavailable ({status}): {detail}")]
    Unavailable {
        provider: String,
        status: u16,
        detail: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("Could not reach {provider}: {message}. Please try again.")]
    Transient { provider: String, message: String },

    #[error("No analysis generated. Please try with a different image.")]
    UnexpectedShape { provider: String },
}

impl VisionError {
    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn quota_exhausted(
        provider: impl Into<String>,
        message: impl Into<String>,
        retry_after_seconds: Option<u64>,
    ) -> Self {
        Self::QuotaExhausted {
            provider: provider.into(),
            message: message.into(),
            retry_after_seconds,
        }
    }

    pub fn rejected(provider: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            provider: provider.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn unavailable(
        provider: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
        retry_after_seconds: Option<u64>,
    ) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            status,
            detail: detail.into(),
            retry_after_seconds,
        }
    }

    pub fn transient(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn unexpected_shape(provider: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            provider: provider.into(),
        }
    }

    /// Machine-readable failure class
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::QuotaExhausted { .. } => "quota_exhausted",
            Self::Rejected { .. } => "provider_rejected",
            Self::Unavailable { .. } => "provider_unavailable",
            Self::Transient { .. } => "network_error",
            Self::UnexpectedShape { .. } => "unexpected_response",
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::Configuration { provider, .. }
            | Self::QuotaExhausted { provider, .. }
            | Self::Rejected { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::Transient { provider, .. }
            | Self::UnexpectedShape { provider } => provider,
        }
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::QuotaExhausted {
                retry_after_seconds,
                ..
            }
            | Self::Unavailable {
                retry_after_seconds,
                ..
            } => *retry_after_seconds,
            _ => None,
        }
    }

    /// Whether the provider refused because its quota or rate limit was hit
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExhausted { .. })
    }
}
