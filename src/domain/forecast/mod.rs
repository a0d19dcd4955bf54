//! Fishing forecast domain

mod entity;
mod moon;
mod validation;

pub use entity::{FeedingWindow, Forecast, ForecastRequest};
pub use moon::{
    moon_age_days, moon_illumination, moon_phase, moon_transit_hour, MoonPhase,
    SYNODIC_MONTH_DAYS,
};
pub use validation::{validate_forecast_request, ForecastValidationError};

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Forecast lookup by location and optional coordinates
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast, DomainError>;
}
