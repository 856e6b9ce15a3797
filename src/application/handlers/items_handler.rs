//! Item and stock movement endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::{ApiResult, AppState};
use crate::domain::entities::movement::MoveType;
use crate::persistence::models::{CreateMovement, ItemSummary};

/// GET /items
pub async fn list_items(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ItemSummary>> {
    let items = state
        .items
        .list_summary()
        .await
        .map_err(|e| state.reply_error(e.into()))?;

    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct RecordMovementRequest {
    #[serde(default)]
    pub move_type: String,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub note: String,
}

/// POST /items/:item_id/movements
pub async fn record_movement(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(req): Json<RecordMovementRequest>,
) -> ApiResult<Value> {
    let move_type =
        MoveType::parse(&req.move_type).map_err(|e| state.reply_error(e.into()))?;

    state
        .recorder
        .record(CreateMovement {
            item_id,
            move_type,
            qty: req.qty,
            note: req.note,
        })
        .await
        .map_err(|e| state.reply_error(e))?;

    Ok(Json(json!({"ok": true})))
}

#[derive(Debug, Deserialize)]
pub struct MovementWindow {
    pub days: Option<i64>,
}

/// GET /items/:item_id/movements?days=N
pub async fn list_movements(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Query(window): Query<MovementWindow>,
) -> ApiResult<Vec<Value>> {
    let days = window.days.unwrap_or(30);

    let movements = state
        .recorder
        .list_window(item_id, days)
        .await
        .map_err(|e| state.reply_error(e))?;

    let rows = movements
        .iter()
        .map(|m| {
            json!({
                "ts": m.created_at,
                "move_type": m.move_type,
                "qty": m.qty,
                "note": m.note,
            })
        })
        .collect();

    Ok(Json(rows))
}
