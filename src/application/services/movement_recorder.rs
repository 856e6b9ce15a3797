//! Movement Recorder
//!
//! Appends immutable stock movement rows and atomically adjusts the owning
//! item's on-hand counter. Both writes share one transaction: a failed
//! on-hand update rolls the movement back, so no partial movement is ever
//! observable.

use chrono::{Duration, Utc};
use tracing::{debug, error};

use crate::application::AppError;
use crate::domain::errors::ValidationError;
use crate::persistence::models::{CreateMovement, MovementRecord};
use crate::persistence::{DatabaseError, DbPool};

/// Bounds for the trailing movement listing window, in days
const WINDOW_DAYS_MIN: i64 = 1;
const WINDOW_DAYS_MAX: i64 = 365;

pub struct MovementRecorder {
    pool: DbPool,
}

impl MovementRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a stock movement and apply its on-hand delta.
    ///
    /// IN increments the item's on_hand by qty, OUT decrements it, ADJUST
    /// leaves it unchanged (audit-only). There is no lower bound on
    /// on_hand; OUT movements may drive it negative.
    pub async fn record(&self, movement: CreateMovement) -> Result<MovementRecord, AppError> {
        if movement.qty <= 0 {
            return Err(ValidationError::InvalidQuantity(movement.qty).into());
        }

        let mut tx = self.pool.begin().await?;

        let item: Option<(i64,)> = sqlx::query_as("SELECT id FROM item WHERE id = ?1")
            .bind(movement.item_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to look up item {}: {}", movement.item_id, e);
                DatabaseError::QueryError(format!("Failed to look up item: {}", e))
            })?;

        if item.is_none() {
            // Dropping the transaction rolls it back; nothing was written.
            return Err(AppError::ItemNotFound(movement.item_id));
        }

        let record = sqlx::query_as::<_, MovementRecord>(
            r#"
            INSERT INTO stock_movement (item_id, move_type, qty, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(movement.item_id)
        .bind(movement.move_type.as_str())
        .bind(movement.qty)
        .bind(&movement.note)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert movement: {}", e);
            DatabaseError::QueryError(format!("Failed to insert movement: {}", e))
        })?;

        let delta = movement.move_type.on_hand_delta(movement.qty);
        if delta != 0 {
            let rows_affected = sqlx::query("UPDATE item SET on_hand = on_hand + ?1 WHERE id = ?2")
                .bind(delta)
                .bind(movement.item_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to update on_hand for item {}: {}", movement.item_id, e);
                    DatabaseError::QueryError(format!("Failed to update on_hand: {}", e))
                })?
                .rows_affected();

            if rows_affected == 0 {
                return Err(DatabaseError::QueryError(format!(
                    "Item disappeared during movement: {}",
                    movement.item_id
                ))
                .into());
            }
        }

        tx.commit().await?;

        debug!(
            "Recorded {} movement of {} for item {}",
            record.move_type, record.qty, record.item_id
        );
        Ok(record)
    }

    /// List an item's movements within the trailing `days` window,
    /// newest first. The window is wall-clock relative, not simulated-day
    /// relative.
    pub async fn list_window(
        &self,
        item_id: i64,
        days: i64,
    ) -> Result<Vec<MovementRecord>, AppError> {
        if !(WINDOW_DAYS_MIN..=WINDOW_DAYS_MAX).contains(&days) {
            return Err(ValidationError::InvalidWindow(days).into());
        }

        let cutoff = Utc::now() - Duration::days(days);

        let records = sqlx::query_as::<_, MovementRecord>(
            r#"
            SELECT * FROM stock_movement
            WHERE item_id = ?1 AND created_at >= ?2
            ORDER BY created_at DESC
            "#,
        )
        .bind(item_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list movements for item {}: {}", item_id, e);
            DatabaseError::QueryError(format!("Failed to list movements: {}", e))
        })?;

        Ok(records)
    }
}
