//! Health and metrics handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /status
pub async fn status(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.flows.status().await?;
    Ok("OK")
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Json<BTreeMap<&'static str, u64>> {
    Json(state.metrics.snapshot())
}
