//! # Health Check Handler

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub active_runs: usize,
    pub tracked_runs: usize,
    pub timestamp: DateTime<Utc>,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        environment: state.environment.clone(),
        active_runs: state.registry.active_count(),
        tracked_runs: state.registry.len(),
        timestamp: Utc::now(),
    })
}
