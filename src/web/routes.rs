//! Route definitions grouped by concern.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::constants::http::{HEALTH_PATH, ITEMS_PATH, RUNS_PATH};
use crate::web::{handlers, state::AppState};

/// Liveness probe
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route(HEALTH_PATH, get(handlers::health::health_check))
}

/// Item submission ingress
pub fn ingress_routes() -> Router<Arc<AppState>> {
    Router::new().route(ITEMS_PATH, post(handlers::items::submit_item))
}

/// Run status lookup
pub fn run_routes() -> Router<Arc<AppState>> {
    Router::new().route(RUNS_PATH, get(handlers::runs::get_run))
}
