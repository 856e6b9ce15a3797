//! Database Repositories
//!
//! Typed data-access layer for item master data and the audit event log.
//! Each repository owns a pool handle and validates its inputs before
//! touching the store. Transactional multi-table writes live in the
//! application services; `EventLogRepository::append_in_tx` lets them reuse
//! the event insert inside their own transaction.

use super::models::{EventRecord, ItemRecord, ItemSummary};
use super::{DatabaseError, DbPool};
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, error};

/// Item master data repository (read-only; writes flow through movements)
pub struct ItemRepository {
    pool: DbPool,
}

impl ItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Board listing: id, sku, name, on_hand, reorder_point, ordered by id
    pub async fn list_summary(&self) -> Result<Vec<ItemSummary>, DatabaseError> {
        let records = sqlx::query_as::<_, ItemSummary>(
            "SELECT id, sku, name, on_hand, reorder_point FROM item ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list items: {}", e);
            DatabaseError::QueryError(format!("Failed to list items: {}", e))
        })?;

        Ok(records)
    }

    /// Full item rows ordered by id (planner input)
    pub async fn list_all(&self) -> Result<Vec<ItemRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, ItemRecord>("SELECT * FROM item ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list items: {}", e);
                DatabaseError::QueryError(format!("Failed to list items: {}", e))
            })?;

        Ok(records)
    }

    /// Get item by ID
    pub async fn get(&self, id: i64) -> Result<Option<ItemRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, ItemRecord>("SELECT * FROM item WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to get item {}: {}", id, e);
                DatabaseError::QueryError(format!("Failed to get item: {}", e))
            })?;

        Ok(record)
    }
}

/// Append-only audit event log repository
pub struct EventLogRepository {
    pool: DbPool,
}

impl EventLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an event. The payload is opaque structured data; no schema is
    /// enforced.
    pub async fn append(
        &self,
        actor: &str,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<EventRecord, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::append_in_tx(&mut conn, actor, event_type, payload).await
    }

    /// Append an event on an existing connection, typically inside a
    /// caller-owned transaction so the event commits together with the state
    /// change it records.
    pub async fn append_in_tx(
        conn: &mut SqliteConnection,
        actor: &str,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<EventRecord, DatabaseError> {
        let payload_json = serde_json::to_string(payload)
            .map_err(|e| DatabaseError::QueryError(format!("Failed to serialize payload: {}", e)))?;

        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            INSERT INTO event_log (ts, actor, event_type, payload_json)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(actor)
        .bind(event_type)
        .bind(&payload_json)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            error!("Failed to append event: {}", e);
            DatabaseError::QueryError(format!("Failed to append event: {}", e))
        })?;

        debug!("Appended event: {} by {}", record.event_type, record.actor);
        Ok(record)
    }

    /// Get recent events, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<EventRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, EventRecord>(
            "SELECT * FROM event_log ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get recent events: {}", e);
            DatabaseError::QueryError(format!("Failed to get recent events: {}", e))
        })?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{init_database, seed_demo_items};

    #[tokio::test]
    async fn test_item_listing_ordered_by_id() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        seed_demo_items(&pool).await.unwrap();
        let repo = ItemRepository::new(pool);

        let summary = repo.list_summary().await.unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].sku, "FG-BOLT");
        assert_eq!(summary[1].sku, "FG-NUT");
        assert_eq!(summary[2].sku, "RM-STEEL");
        assert_eq!(summary[1].on_hand, 24);

        let full = repo.list_all().await.unwrap();
        assert_eq!(full[1].reorder_qty, 80);
        assert_eq!(full[1].safety_stock, 10);
    }

    #[tokio::test]
    async fn test_item_get_missing_is_none() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = ItemRepository::new(pool);

        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_event_append_and_recent_desc() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = EventLogRepository::new(pool);

        repo.append("sim", "TICK", &serde_json::json!({"note": "first"}))
            .await
            .unwrap();
        repo.append("planner", "PO_CREATED", &serde_json::json!({"po_id": 1}))
            .await
            .unwrap();

        let events = repo.recent(100).await.unwrap();
        assert_eq!(events.len(), 2);
        // Newest first
        assert_eq!(events[0].event_type, "PO_CREATED");
        assert_eq!(events[1].event_type, "TICK");
        assert_eq!(events[0].payload()["po_id"], 1);
    }

    #[tokio::test]
    async fn test_event_recent_respects_limit() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = EventLogRepository::new(pool);

        for i in 0..5 {
            repo.append("sim", "TICK", &serde_json::json!({"i": i}))
                .await
                .unwrap();
        }

        let events = repo.recent(3).await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].payload()["i"], 4);
    }
}
