//! Planner proposal, decision, and event feed endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::services::action_gateway::{ActionOutcome, ActionRequest};
use crate::application::{ApiResult, AppState};
use crate::domain::entities::action::PlannerAction;
use crate::domain::entities::proposal::Proposal;
use crate::domain::services::planner;

/// GET /agents/planner/proposals
///
/// Re-derives proposals fresh from the item ledger on every call.
pub async fn proposals(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Proposal>> {
    let items = state
        .items
        .list_all()
        .await
        .map_err(|e| state.reply_error(e.into()))?;

    let snapshots: Vec<_> = items.iter().map(Into::into).collect();

    Ok(Json(planner::propose(&snapshots)))
}

#[derive(Debug, Deserialize)]
pub struct ActRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub proposal_id: String,
}

/// POST /agents/planner/act
pub async fn act(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActRequest>,
) -> ApiResult<Value> {
    let action = PlannerAction::parse(&req.action).map_err(|e| state.reply_error(e.into()))?;

    let outcome = state
        .gateway
        .act(ActionRequest {
            action,
            item_id: req.item_id,
            qty: req.qty,
            sku: req.sku,
            proposal_id: req.proposal_id,
        })
        .await
        .map_err(|e| state.reply_error(e))?;

    let body = match outcome {
        ActionOutcome::Approved { po_id, message } => {
            json!({"ok": true, "message": message, "po_id": po_id})
        }
        ActionOutcome::Rejected { message } => json!({"ok": true, "message": message}),
    };

    Ok(Json(body))
}

/// GET /events — latest 100 audit events, newest first
pub async fn recent_events(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Value>> {
    let events = state
        .events
        .recent(100)
        .await
        .map_err(|e| state.reply_error(e.into()))?;

    let rows = events
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "ts": e.ts,
                "actor": e.actor,
                "event_type": e.event_type,
                "payload_json": e.payload(),
            })
        })
        .collect();

    Ok(Json(rows))
}
