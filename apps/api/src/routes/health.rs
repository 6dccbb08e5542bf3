use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "job-packager"
    }))
}

/// GET /check_generator
/// Reports whether the text generator answers, with its model listing when it does.
pub async fn check_generator_handler(State(state): State<AppState>) -> Json<Value> {
    match state.generator.status().await {
        Ok(models) => Json(json!({
            "status": "running",
            "models": models
        })),
        Err(e) => {
            warn!("Text generator at {} not reachable: {e}", state.generator.endpoint());
            Json(json!({
                "status": "error",
                "message": format!("Text generator not running: {e}")
            }))
        }
    }
}
