//! # Item Ingress Handler
//!
//! `POST /items` starts one orchestration run per request and acknowledges
//! without waiting for the run.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::constants::{events, http::ACK_RESULT};
use crate::models::{JobRequest, WorkflowEvent};
use crate::web::response_types::ApiError;
use crate::web::state::AppState;

/// Acknowledgment returned once a run has been started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAccepted {
    pub result: String,
}

/// Submit an item: POST /items
///
/// The body is opaque text; an absent body becomes `""`. Bodies that are not
/// valid UTF-8 are rejected with 400 and no run is started.
pub async fn submit_item(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ItemAccepted>, ApiError> {
    let text = String::from_utf8(body.to_vec()).map_err(|e| {
        warn!(error = %e, body_len = body.len(), "Rejecting non-UTF-8 item body");
        ApiError::bad_request("request body must be valid UTF-8")
    })?;
    let detail = JobRequest::new(text);
    let input = WorkflowEvent::new(detail, &state.event_source, &state.detail_type);

    let handle = state.launcher.start_run(input.clone()).await.map_err(|e| {
        error!(error = %e, "Failed to start orchestration run");
        ApiError::from(e)
    })?;

    info!(
        transaction_id = %handle.transaction_id,
        body_len = body.len(),
        "Item accepted"
    );

    // The run is already started; a lost notification must not fail the request
    if let Err(e) = state.publisher.publish_serialized(events::SERVICE_STATUS, &input) {
        warn!(
            transaction_id = %handle.transaction_id,
            error = %e,
            "Failed to publish service status event"
        );
    }

    Ok(Json(ItemAccepted {
        result: ACK_RESULT.to_string(),
    }))
}
