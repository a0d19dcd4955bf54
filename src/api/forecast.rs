use axum::extract::State;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::forecast::{validate_forecast_request, Forecast, ForecastRequest};

/// `POST /forecast`
pub async fn forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<Forecast>, ApiError> {
    validate_forecast_request(&request)?;

    Ok(Json(state.forecast.forecast(&request).await?))
}
