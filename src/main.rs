use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leanerp::application::handlers::{items_handler, planner_handler, sim_handler};
use leanerp::application::AppState;
use leanerp::config::ServerConfig;
use leanerp::persistence;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leanerp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!("LeanERP inventory backend starting...");

    let pool = persistence::init_database(&config.database.url).await?;
    persistence::seed_demo_items(&pool).await?;

    let state = Arc::new(AppState::new(pool, config.database.url.clone()));

    // Dev frontend origins (Vite)
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:5173".parse::<HeaderValue>()?,
            "http://127.0.0.1:5173".parse::<HeaderValue>()?,
        ])
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/db/ping", get(db_ping))
        .route("/items", get(items_handler::list_items))
        .route(
            "/items/:item_id/movements",
            get(items_handler::list_movements).post(items_handler::record_movement),
        )
        .route("/agents/planner/proposals", get(planner_handler::proposals))
        .route("/agents/planner/act", post(planner_handler::act))
        .route("/events", get(planner_handler::recent_events))
        .route("/sim/tick", post(sim_handler::tick))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = config.bind_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let server = axum::serve(listener, app);

    let shutdown_signal = async {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    server.with_graceful_shutdown(shutdown_signal).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Storage connectivity probe, reporting the configured connection target
async fn db_ping(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => Json(serde_json::json!({"ok": true, "url": state.database_url})),
        Err(e) => Json(serde_json::json!({
            "ok": false,
            "error": e.to_string(),
            "url": state.database_url,
        })),
    }
}
