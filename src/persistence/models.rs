//! Database Models
//!
//! Persistent records for items, stock movements, purchase orders, events,
//! and the simulation state singleton.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::services::planner::StockSnapshot;

/// Item record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemRecord {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub uom: String,
    pub reorder_point: i64,
    pub reorder_qty: i64,
    pub safety_stock: i64,
    pub lead_time_days: i64,
    pub on_hand: i64,
}

impl From<&ItemRecord> for StockSnapshot {
    fn from(item: &ItemRecord) -> Self {
        StockSnapshot {
            item_id: item.id,
            sku: item.sku.clone(),
            name: item.name.clone(),
            on_hand: item.on_hand,
            reorder_point: item.reorder_point,
            reorder_qty: item.reorder_qty,
            safety_stock: item.safety_stock,
        }
    }
}

/// Compact item view for the board listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemSummary {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub on_hand: i64,
    pub reorder_point: i64,
}

/// Stock movement record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MovementRecord {
    pub id: i64,
    pub item_id: i64,
    pub move_type: String, // "IN", "OUT", or "ADJUST"
    pub qty: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Purchase order record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrderRecord {
    pub id: i64,
    pub item_id: i64,
    pub qty: i64,
    pub status: String, // "OPEN", "CLOSED", or "CANCELED"
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Event log record in database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub ts: DateTime<Utc>,
    pub actor: String,
    pub event_type: String,
    pub payload_json: Option<String>, // JSON string, opaque to the store
}

impl EventRecord {
    /// Parse the payload back into structured JSON for API responses.
    /// A payload that fails to parse is returned as a plain string.
    pub fn payload(&self) -> serde_json::Value {
        match &self.payload_json {
            Some(raw) => serde_json::from_str(raw)
                .unwrap_or_else(|_| serde_json::Value::String(raw.clone())),
            None => serde_json::Value::Null,
        }
    }
}

/// Create movement input
#[derive(Debug, Clone)]
pub struct CreateMovement {
    pub item_id: i64,
    pub move_type: crate::domain::entities::movement::MoveType,
    pub qty: i64,
    pub note: String,
}
