//! Catch log endpoints

use axum::extract::State;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, CatchLoggedResponse, Json};
use crate::domain::catch::{validate_catch, CatchRecord, NewCatch};

/// `POST /catches`
pub async fn log_catch(
    State(state): State<AppState>,
    Json(entry): Json<NewCatch>,
) -> Result<Json<CatchLoggedResponse>, ApiError> {
    validate_catch(&entry)?;

    let record = state.catches.append(entry).await?;
    let total = state.catches.count().await?;

    info!(id = record.id, species = %record.species, total, "Catch logged");

    Ok(Json(CatchLoggedResponse {
        message: format!("Catch logged successfully! Total catches: {}", total),
        id: record.id,
    }))
}

/// `GET /catches`
pub async fn list_catches(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatchRecord>>, ApiError> {
    Ok(Json(state.catches.list().await?))
}
