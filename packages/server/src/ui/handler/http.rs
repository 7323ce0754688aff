//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::StateSnapshotDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint: connection counts, queues and room sizes
pub async fn debug_state(State(state): State<Arc<AppState>>) -> Json<StateSnapshotDto> {
    let snapshot = state.coordinator.snapshot().await;
    Json(StateSnapshotDto::from(snapshot))
}
