//! Simulation clock endpoint

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::application::services::sim_clock::TickSummary;
use crate::application::{ApiResult, AppState};

/// POST /sim/tick
pub async fn tick(State(state): State<Arc<AppState>>) -> ApiResult<TickSummary> {
    let summary = state.clock.tick().await.map_err(|e| state.reply_error(e))?;

    Ok(Json(summary))
}
