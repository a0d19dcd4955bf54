use axum::extract::State;

use super::state::AppState;
use super::types::{Json, UsageStatsResponse};

/// `GET /usage-stats`
pub async fn usage_stats(State(state): State<AppState>) -> Json<UsageStatsResponse> {
    Json(UsageStatsResponse {
        success: true,
        usage: state.ledger().snapshot().await,
    })
}
