//! Application Layer
//!
//! Orchestration over the domain logic and the persistence layer: the
//! transactional services (movement recorder, action gateway, sim clock),
//! the HTTP handlers, and the shared `AppState` they hang off of.

pub mod handlers;
pub mod services;

use axum::http::StatusCode;
use axum::Json;
use thiserror::Error;

use crate::domain::errors::ValidationError;
use crate::persistence::repository::{EventLogRepository, ItemRepository};
use crate::persistence::{DatabaseError, DbPool};
use self::services::action_gateway::ActionGateway;
use self::services::movement_recorder::MovementRecorder;
use self::services::sim_clock::SimClock;

/// Operation error, mapped onto HTTP status codes at the handler boundary
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Storage(DatabaseError::ConnectionError(e))
    }
}

/// Handler result: a JSON body or an HTTP error tuple
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<serde_json::Value>)>;

/// Shared state behind every HTTP handler.
///
/// All components receive their pool handle at construction time; nothing
/// reaches for a process-wide connection.
pub struct AppState {
    pub pool: DbPool,
    pub items: ItemRepository,
    pub events: EventLogRepository,
    pub recorder: MovementRecorder,
    pub gateway: ActionGateway,
    pub clock: SimClock,
    pub database_url: String,
}

impl AppState {
    pub fn new(pool: DbPool, database_url: impl Into<String>) -> Self {
        Self {
            items: ItemRepository::new(pool.clone()),
            events: EventLogRepository::new(pool.clone()),
            recorder: MovementRecorder::new(pool.clone()),
            gateway: ActionGateway::new(pool.clone()),
            clock: SimClock::new(pool.clone()),
            pool,
            database_url: database_url.into(),
        }
    }

    /// Map an operation error onto the HTTP error response.
    ///
    /// Storage errors include the configured connection target for
    /// diagnostics, matching what `/db/ping` reports.
    pub fn reply_error(&self, err: AppError) -> (StatusCode, Json<serde_json::Value>) {
        match err {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": e.to_string()})),
            ),
            AppError::ItemNotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": format!("Item not found: {}", id)})),
            ),
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "database": self.database_url,
                })),
            ),
        }
    }
}
