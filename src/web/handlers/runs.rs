//! # Run Status Handler

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::orchestration::RunSnapshot;
use crate::web::response_types::ApiError;
use crate::web::state::AppState;

/// Look up a run: GET /v1/runs/{transaction_id}
pub async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let transaction_id =
        Uuid::parse_str(&transaction_id).map_err(|_| ApiError::invalid_uuid(&transaction_id))?;

    state
        .registry
        .get(&transaction_id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}
