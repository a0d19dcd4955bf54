//! Analyze endpoint response body

use serde::{Deserialize, Serialize};

use crate::domain::usage::UsageStats;
use crate::infrastructure::vision::AnalysisOutcome;

/// Body returned by every `/analyze-*` route.
///
/// Provider failures are reported here with `success: false` rather than as
/// an HTTP error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    /// Analysis text, or a readable failure message
    pub recommendation: String,
    pub filename: Option<String>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageStats>,
}

impl AnalyzeResponse {
    pub fn from_outcome(outcome: AnalysisOutcome, filename: Option<String>) -> Self {
        let AnalysisOutcome {
            provider,
            result,
            notice,
            usage,
        } = outcome;

        match result {
            Ok(recommendation) => Self {
                success: true,
                recommendation,
                filename,
                provider,
                error: None,
                notice,
                retry_after_seconds: None,
                usage,
            },
            Err(e) => Self {
                success: false,
                recommendation: e.to_string(),
                filename,
                provider,
                error: Some(e.code().to_string()),
                notice,
                retry_after_seconds: e.retry_after_seconds(),
                usage,
            },
        }
    }
}

/// Body of `GET /usage-stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStatsResponse {
    pub success: bool,
    pub usage: UsageStats,
}

/// Body of `POST /catches`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchLoggedResponse {
    pub message: String,
    pub id: u64,
}
