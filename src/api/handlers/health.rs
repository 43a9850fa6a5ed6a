use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let sources = state.cache.sources();
    let present = sources.iter().filter(|s| s.path.is_file()).count();

    Json(json!({
        "status": "healthy",
        "sources": sources.len(),
        "sources_present": present,
        "cache_ttl_secs": state.cache.ttl().as_secs(),
    }))
}
