use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /v1/api/health - 健康检查
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let engine = match state.search.client().ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Index engine health check failed: {}", e);
            "unreachable"
        }
    };

    Json(json!({
        "status": "ok",
        "engine": engine,
        "index": state.search.index(),
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}
