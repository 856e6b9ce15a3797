//! Action Gateway
//!
//! Accepts a human/agent decision on a replenishment proposal. An approval
//! creates an OPEN purchase order and its PO_CREATED audit event in one
//! transaction, purchase order first, so neither is ever observable without
//! the other. A rejection only appends a PROPOSAL_REJECTED event.

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::application::AppError;
use crate::domain::entities::action::PlannerAction;
use crate::domain::entities::order::OrderStatus;
use crate::domain::errors::ValidationError;
use crate::persistence::repository::EventLogRepository;
use crate::persistence::{DatabaseError, DbPool};

/// A planner decision, as received from the API
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: PlannerAction,
    pub item_id: i64,
    pub qty: i64,
    pub sku: String,
    pub proposal_id: String,
}

/// What the gateway did with the decision
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Approved { po_id: i64, message: String },
    Rejected { message: String },
}

pub struct ActionGateway {
    pool: DbPool,
}

impl ActionGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply a proposal decision. All validation happens before any write.
    pub async fn act(&self, req: ActionRequest) -> Result<ActionOutcome, AppError> {
        if req.item_id <= 0 {
            return Err(ValidationError::InvalidItemId(req.item_id).into());
        }

        match req.action {
            PlannerAction::Approve => self.approve(&req).await,
            PlannerAction::Reject => self.reject(&req).await,
        }
    }

    async fn approve(&self, req: &ActionRequest) -> Result<ActionOutcome, AppError> {
        if req.qty <= 0 {
            return Err(ValidationError::InvalidQuantity(req.qty).into());
        }

        let mut tx = self.pool.begin().await?;

        let note = format!("Planner proposal {} for {}", req.proposal_id, req.sku);
        let (po_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO purchase_order (item_id, qty, status, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(req.item_id)
        .bind(req.qty)
        .bind(OrderStatus::Open.as_str())
        .bind(&note)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to create purchase order: {}", e);
            DatabaseError::QueryError(format!("Failed to create purchase order: {}", e))
        })?;

        EventLogRepository::append_in_tx(
            &mut *tx,
            "planner",
            "PO_CREATED",
            &json!({
                "po_id": po_id,
                "item_id": req.item_id,
                "qty": req.qty,
                "sku": req.sku,
            }),
        )
        .await?;

        tx.commit().await?;

        info!("Created PO-{} for item {} ({} units)", po_id, req.item_id, req.qty);
        Ok(ActionOutcome::Approved {
            po_id,
            message: format!("📝 Created PO-{} {} pcs for {}", po_id, req.qty, req.sku),
        })
    }

    async fn reject(&self, req: &ActionRequest) -> Result<ActionOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        EventLogRepository::append_in_tx(
            &mut *tx,
            "planner",
            "PROPOSAL_REJECTED",
            &json!({
                "proposal_id": req.proposal_id,
                "item_id": req.item_id,
                "sku": req.sku,
            }),
        )
        .await?;

        tx.commit().await?;

        info!("Rejected proposal {} for item {}", req.proposal_id, req.item_id);
        Ok(ActionOutcome::Rejected {
            message: format!("❌ Rejected {} for {}", req.proposal_id, req.sku),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{init_database, seed_demo_items};

    async fn setup() -> (DbPool, ActionGateway) {
        let pool = init_database("sqlite::memory:").await.unwrap();
        seed_demo_items(&pool).await.unwrap();
        let gateway = ActionGateway::new(pool.clone());
        (pool, gateway)
    }

    fn approve_req() -> ActionRequest {
        ActionRequest {
            action: PlannerAction::Approve,
            item_id: 1,
            qty: 40,
            sku: "FG-BOLT".to_string(),
            proposal_id: "PLN-1".to_string(),
        }
    }

    async fn table_count(pool: &DbPool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_approve_creates_open_po_and_event() {
        let (pool, gateway) = setup().await;

        let outcome = gateway.act(approve_req()).await.unwrap();
        let ActionOutcome::Approved { po_id, message } = outcome else {
            panic!("expected approval outcome");
        };
        assert_eq!(message, format!("📝 Created PO-{} 40 pcs for FG-BOLT", po_id));

        let (qty, status, note): (i64, String, String) = sqlx::query_as(
            "SELECT qty, status, note FROM purchase_order WHERE id = ?1",
        )
        .bind(po_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(qty, 40);
        assert_eq!(status, "OPEN");
        assert_eq!(note, "Planner proposal PLN-1 for FG-BOLT");

        assert_eq!(table_count(&pool, "purchase_order").await, 1);
        assert_eq!(table_count(&pool, "event_log").await, 1);

        let (actor, event_type, payload): (String, String, String) = sqlx::query_as(
            "SELECT actor, event_type, payload_json FROM event_log ORDER BY id DESC LIMIT 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(actor, "planner");
        assert_eq!(event_type, "PO_CREATED");
        let payload: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(payload["po_id"], po_id);
        assert_eq!(payload["item_id"], 1);
        assert_eq!(payload["qty"], 40);
        assert_eq!(payload["sku"], "FG-BOLT");
    }

    #[tokio::test]
    async fn test_reject_appends_event_without_po() {
        let (pool, gateway) = setup().await;

        let req = ActionRequest {
            action: PlannerAction::Reject,
            item_id: 2,
            qty: 0,
            sku: "FG-NUT".to_string(),
            proposal_id: "PLN-2".to_string(),
        };
        let outcome = gateway.act(req).await.unwrap();
        let ActionOutcome::Rejected { message } = outcome else {
            panic!("expected rejection outcome");
        };
        assert_eq!(message, "❌ Rejected PLN-2 for FG-NUT");

        assert_eq!(table_count(&pool, "purchase_order").await, 0);
        assert_eq!(table_count(&pool, "event_log").await, 1);

        let (event_type, payload): (String, String) = sqlx::query_as(
            "SELECT event_type, payload_json FROM event_log ORDER BY id DESC LIMIT 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(event_type, "PROPOSAL_REJECTED");
        let payload: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(payload["proposal_id"], "PLN-2");
        assert_eq!(payload["item_id"], 2);
    }

    #[tokio::test]
    async fn test_invalid_item_id_rejected_before_any_write() {
        let (pool, gateway) = setup().await;

        let mut req = approve_req();
        req.item_id = 0;
        let err = gateway.act(req).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidItemId(0))
        ));

        assert_eq!(table_count(&pool, "purchase_order").await, 0);
        assert_eq!(table_count(&pool, "event_log").await, 0);
    }

    #[tokio::test]
    async fn test_approve_with_non_positive_qty_rejected_before_any_write() {
        let (pool, gateway) = setup().await;

        let mut req = approve_req();
        req.qty = 0;
        let err = gateway.act(req).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidQuantity(0))
        ));

        assert_eq!(table_count(&pool, "purchase_order").await, 0);
        assert_eq!(table_count(&pool, "event_log").await, 0);
    }
}
