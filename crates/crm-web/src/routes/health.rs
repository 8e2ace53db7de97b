//! Liveness and storage health.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "CRM API is running" }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.graph.ping().await {
        Ok(message) => (StatusCode::OK, Json(json!({ "status": "ok", "graph": message }))),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" })))
        }
    }
}
