//! Domain layer - Core business logic and entities

pub mod catch;
pub mod clock;
pub mod error;
pub mod forecast;
pub mod usage;
pub mod vision;

pub use catch::{validate_catch, CatchRecord, CatchRepository, CatchValidationError, NewCatch};
pub use clock::{Clock, SystemClock};
pub use error::DomainError;
pub use forecast::{
    validate_forecast_request, FeedingWindow, Forecast, ForecastRequest, ForecastService,
    ForecastValidationError, MoonPhase,
};
pub use usage::{
    can_proceed, compute_wait_seconds, Admission, QuotaDenial, QuotaPolicy, UsageRecord,
    UsageStats, UsageStore, WindowStats,
};
pub use vision::{ImagePayload, ProviderStatus, VisionError, VisionProvider};
