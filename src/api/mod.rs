//! HTTP interface - axum routes over the core ledger operations.
//!
//! Handlers only extract, call into [`crate::core`], and wrap results in the
//! `{ "success": true, ... }` envelope. Errors render through [`crate::errors::Error`].

/// Authenticated actor extraction
pub mod actor;
/// Ledger route handlers
pub mod ledger;

use crate::config::LedgerConfig;
use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub database: DatabaseConnection,
    /// Validation and paging limits
    pub ledger: LedgerConfig,
}

impl AppState {
    /// Creates the handler state from a connection and the ledger limits.
    #[must_use]
    pub const fn new(database: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self { database, ledger }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/booking-ledger", post(ledger::create_payment))
        .route(
            "/booking-ledger/client/:client_id",
            get(ledger::list_payments),
        )
        .route(
            "/booking-ledger/:id",
            get(ledger::get_payment).delete(ledger::delete_payment),
        )
        .route("/booking-ledger/:id/restore", patch(ledger::restore_payment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
