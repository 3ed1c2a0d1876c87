use axum::{extract::State, http::StatusCode, Json};

use crate::models::status::{ErrorResponse, StatsResponse};
use crate::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let counts = state.offers.counts().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        )
    })?;

    Ok(Json(counts.into()))
}
