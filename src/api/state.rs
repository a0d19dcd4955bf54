//! Application state for shared services

use std::sync::Arc;

use crate::domain::catch::CatchRepository;
use crate::domain::forecast::ForecastService;
use crate::infrastructure::usage::UsageLedger;
use crate::infrastructure::vision::ProviderRouter;

/// Services shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub router: Arc<ProviderRouter>,
    pub catches: Arc<dyn CatchRepository>,
    pub forecast: Arc<dyn ForecastService>,
    /// Largest accepted image upload in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        router: Arc<ProviderRouter>,
        catches: Arc<dyn CatchRepository>,
        forecast: Arc<dyn ForecastService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            router,
            catches,
            forecast,
            max_upload_bytes,
        }
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        self.router.ledger()
    }
}
