//! Unauthenticated service endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - Service information
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "LedgerLens API Server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - Liveness plus uptime
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback for unknown routes
pub async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found"
        })),
    )
}
