use axum::response::Json;
use serde_json::{Value, json};

/// Liveness check of the bridge.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "moodtune-bridge",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
