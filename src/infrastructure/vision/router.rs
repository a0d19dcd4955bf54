//! Primary/secondary provider routing
//!
//! Primary calls are gated by the usage ledger and only successful primary
//! calls are recorded. The smart route falls back to the secondary provider
//! whenever the primary is denied or fails.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::domain::usage::UsageStats;
use crate::domain::vision::{ImagePayload, VisionError, VisionProvider};
use crate::infrastructure::observability::{record_fallback, record_provider_call};
use crate::infrastructure::usage::UsageLedger;

/// Result of one routed analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Display name of the provider that produced `result`
    pub provider: String,
    pub result: Result<String, VisionError>,
    /// Why the smart route fell back, when it did
    pub notice: Option<String>,
    /// Usage after a successful primary call
    pub usage: Option<UsageStats>,
}

impl AnalysisOutcome {
    fn new(provider: impl Into<String>, result: Result<String, VisionError>) -> Self {
        Self {
            provider: provider.into(),
            result,
            notice: None,
            usage: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct ProviderRouter {
    primary: Arc<dyn VisionProvider>,
    secondary: Arc<dyn VisionProvider>,
    ledger: Arc<UsageLedger>,
}

impl ProviderRouter {
    pub fn new(
        primary: Arc<dyn VisionProvider>,
        secondary: Arc<dyn VisionProvider>,
        ledger: Arc<UsageLedger>,
    ) -> Self {
        Self {
            primary,
            secondary,
            ledger,
        }
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary.provider_name()
    }

    pub fn secondary_name(&self) -> &'static str {
        self.secondary.provider_name()
    }

    /// Provider label reported when the smart route used the secondary
    pub fn fallback_name(&self) -> String {
        format!("{} (Fallback)", self.secondary.provider_name())
    }

    /// Primary when quota allows, secondary otherwise or on any primary failure
    pub async fn analyze_smart(&self, image: &ImagePayload) -> AnalysisOutcome {
        let permit = match self.ledger.admit().await {
            Ok(permit) => permit,
            Err(denied) => {
                info!(window = denied.denial.window(), "Primary quota exhausted, using fallback");
                record_fallback("quota_exhausted");
                return self.fallback(image, denied.to_string()).await;
            }
        };

        match call_provider(self.primary.as_ref(), image).await {
            Ok(text) => {
                let usage = self.ledger.commit(permit).await;
                let mut outcome = AnalysisOutcome::new(self.primary_name(), Ok(text));
                outcome.usage = Some(usage);
                outcome
            }
            Err(e) => {
                drop(permit);
                warn!(code = e.code(), error = %e, "Primary provider failed, using fallback");
                record_fallback(e.code());
                self.fallback(image, e.to_string()).await
            }
        }
    }

    /// Primary only; quota denials and failures are returned without fallback
    pub async fn analyze_primary(&self, image: &ImagePayload) -> AnalysisOutcome {
        let permit = match self.ledger.admit().await {
            Ok(permit) => permit,
            Err(denied) => {
                let error = VisionError::quota_exhausted(
                    self.primary_name(),
                    denied.to_string(),
                    denied.retry_after_seconds,
                );
                return AnalysisOutcome::new(self.primary_name(), Err(error));
            }
        };

        match call_provider(self.primary.as_ref(), image).await {
            Ok(text) => {
                let usage = self.ledger.commit(permit).await;
                let mut outcome = AnalysisOutcome::new(self.primary_name(), Ok(text));
                outcome.usage = Some(usage);
                outcome
            }
            Err(e) => AnalysisOutcome::new(self.primary_name(), Err(e)),
        }
    }

    /// Secondary only, not subject to the usage ledger
    pub async fn analyze_secondary(&self, image: &ImagePayload) -> AnalysisOutcome {
        let result = call_provider(self.secondary.as_ref(), image).await;
        AnalysisOutcome::new(self.secondary_name(), result)
    }

    async fn fallback(&self, image: &ImagePayload, notice: String) -> AnalysisOutcome {
        let result = call_provider(self.secondary.as_ref(), image).await;
        let mut outcome = AnalysisOutcome::new(self.fallback_name(), result);
        outcome.notice = Some(notice);
        outcome
    }
}

async fn call_provider(
    provider: &dyn VisionProvider,
    image: &ImagePayload,
) -> Result<String, VisionError> {
    let start = Instant::now();
    let result = provider.analyze(image).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.code(),
    };
    record_provider_call(provider.provider_name(), outcome, start.elapsed());

    result
}
