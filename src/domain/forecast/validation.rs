//! Forecast request validation

use thiserror::Error;

use super::entity::ForecastRequest;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastValidationError {
    #[error("Location cannot be empty")]
    EmptyLocation,

    #[error("Latitude must be between -90 and 90")]
    InvalidLatitude,

    #[error("Longitude must be between -180 and 180")]
    InvalidLongitude,
}

pub fn validate_forecast_request(request: &ForecastRequest) -> Result<(), ForecastValidationError> {
    if request.location.trim().is_empty() {
        return Err(ForecastValidationError::EmptyLocation);
    }

    if let Some(lat) = request.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ForecastValidationError::InvalidLatitude);
        }
    }

    if let Some(lon) = request.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ForecastValidationError::InvalidLongitude);
        }
    }

    Ok(())
}
