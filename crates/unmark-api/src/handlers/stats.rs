//! Statistics and health HTTP handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use unmark_core::Statistics;

use crate::{ApiError, AppState};

/// Return the full statistics record.
///
/// # Returns
/// - 200 OK with the camelCase statistics record
/// - 500 with `{error, details}` if the store cannot be read
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(state.stats.get().await?))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Configured providers in fallback order.
    pub providers: Vec<String>,
}

/// Liveness check. Does not touch the statistics store.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        providers: state.chain.provider_names(),
    })
}
