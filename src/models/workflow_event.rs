//! Run input envelope built by the ingress adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::job::{JobHandle, JobRequest};
use crate::constants::workflow::{DEFAULT_DETAIL_TYPE, DEFAULT_EVENT_SOURCE};

/// Input of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    #[serde(rename = "TransactionID")]
    pub transaction_id: Uuid,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Detail")]
    pub detail: JobRequest,
    #[serde(rename = "DetailType")]
    pub detail_type: String,
}

impl WorkflowEvent {
    /// Wrap a request with a fresh transaction id and the current time
    pub fn new(
        detail: JobRequest,
        source: impl Into<String>,
        detail_type: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            time: Utc::now(),
            source: source.into(),
            detail,
            detail_type: detail_type.into(),
        }
    }

    /// Wrap a request using the default source and detail type
    pub fn with_defaults(detail: JobRequest) -> Self {
        Self::new(detail, DEFAULT_EVENT_SOURCE, DEFAULT_DETAIL_TYPE)
    }

    pub fn handle(&self) -> JobHandle {
        JobHandle {
            transaction_id: self.transaction_id,
            started_at: self.time,
        }
    }
}
