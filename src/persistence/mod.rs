//! Persistence Layer
//!
//! SQLite-backed storage for the inventory core, accessed asynchronously
//! via sqlx. All state lives in five tables:
//!
//! - `item`: item master data plus the `on_hand` counter
//! - `stock_movement`: append-only stock movement ledger
//! - `purchase_order`: replenishment orders created by the planner gateway
//! - `event_log`: append-only audit trail of every state transition
//! - `sim_state`: singleton row (id = 1) holding the simulated day counter
//!
//! Migrations run at startup and are idempotent. A small demo seed is
//! applied only when the item table is empty.

pub mod models;
pub mod repository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Database connection pool
pub type DbPool = SqlitePool;

/// Database initialization / query error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

/// Initialize the database connection pool and run migrations
///
/// # Arguments
/// - `database_url`: SQLite URL (e.g., "sqlite://data/leanerp.db")
///
/// # Errors
/// Returns error if the connection or a migration fails
pub async fn init_database(database_url: &str) -> Result<DbPool, DatabaseError> {
    info!("Initializing database: {}", database_url);

    // Ensure data directory exists
    if let Some(db_path) = database_url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::ConnectionError(sqlx::Error::Configuration(Box::new(e)))
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(tracing::log::LevelFilter::Debug);

    // An in-memory SQLite database exists per connection, so the pool must
    // not hand out more than one.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    info!("✓ Database initialized successfully");

    Ok(pool)
}

/// Run database migrations
async fn run_migrations(pool: &DbPool) -> Result<(), DatabaseError> {
    info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sku TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            uom TEXT NOT NULL DEFAULT 'pcs',
            reorder_point INTEGER NOT NULL DEFAULT 0,
            reorder_qty INTEGER NOT NULL DEFAULT 0,
            safety_stock INTEGER NOT NULL DEFAULT 0,
            lead_time_days INTEGER NOT NULL DEFAULT 7,
            on_hand INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create item table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stock_movement (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL REFERENCES item(id),
            move_type TEXT NOT NULL CHECK(move_type IN ('IN', 'OUT', 'ADJUST')),
            qty INTEGER NOT NULL,
            note TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create stock_movement table: {}", e))
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS purchase_order (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL REFERENCES item(id),
            qty INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'OPEN' CHECK(status IN ('OPEN', 'CLOSED', 'CANCELED')),
            note TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create purchase_order table: {}", e))
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ts DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            actor TEXT NOT NULL,
            event_type TEXT NOT NULL,
            payload_json TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create event_log table: {}", e))
    })?;

    // Singleton row, id pinned to 1. No row is inserted here: the sim clock
    // self-heals a missing row on its first tick.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sim_state (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            current_day INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create sim_state table: {}", e))
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_movement_item_time ON stock_movement(item_id, created_at)",
    )
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_event_ts ON event_log(ts)")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_po_status ON purchase_order(status)")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    info!("✓ Database migrations completed successfully");

    Ok(())
}

/// Seed demo items when the item table is empty
pub async fn seed_demo_items(pool: &DbPool) -> Result<(), DatabaseError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item")
        .fetch_one(pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("Failed to count items: {}", e)))?;

    if count > 0 {
        info!("Items already present: {}", count);
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO item (id, sku, name, uom, reorder_point, reorder_qty, safety_stock, lead_time_days, on_hand)
        VALUES
            (1, 'FG-BOLT', 'Hex Bolt', 'pcs', 60, 80, 20, 7, 120),
            (2, 'FG-NUT', 'Hex Nut', 'pcs', 50, 80, 10, 7, 24),
            (3, 'RM-STEEL', 'Steel Rod', 'kg', 200, 200, 50, 10, 500)
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::QueryError(format!("Failed to seed items: {}", e)))?;

    info!("✓ Seeded 3 demo items");
    Ok(())
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://data/leanerp.db")
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/leanerp.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/leanerp.db".to_string());

        Self { url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_init() {
        let pool = init_database("sqlite::memory:").await;
        assert!(pool.is_ok());
    }

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let pool = init_database("sqlite::memory:").await.unwrap();

        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN \
             ('item', 'stock_movement', 'purchase_order', 'event_log', 'sim_state')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(result.0, 5);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = init_database("sqlite::memory:").await.unwrap();

        seed_demo_items(&pool).await.unwrap();
        seed_demo_items(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, "sqlite://data/leanerp.db");
    }
}
