use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Opaque job payload carried from the HTTP body into the run input.
///
/// An absent body is normalised to the empty string, never null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRequest(String);

impl JobRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier correlating a submission to its orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub transaction_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transaction_id)
    }
}

/// Status reported by the submitter and the poller.
///
/// Serialized as the upper-case wire literals. Any literal other than
/// `SUCCEEDED` or `FAILED` normalises to [`JobStatus::Pending`], which is
/// exactly the set of values the orchestrator routes back to Waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    /// Normalise a reported status literal; comparison is case-sensitive
    pub fn from_reported(value: &str) -> Self {
        match value {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        Self::from_reported(&value)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Input handed to a [`crate::orchestration::steps::JobSubmitter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub input: super::WorkflowEvent,
    /// Stable across retries of the same submission
    pub idempotency_key: String,
}

impl SubmissionRequest {
    /// Build a request keyed by the input's transaction id
    pub fn for_input(input: super::WorkflowEvent) -> Self {
        let idempotency_key = input.transaction_id.to_string();
        Self {
            input,
            idempotency_key,
        }
    }
}

/// Output of the submit step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub status: JobStatus,
    pub body: String,
}

/// Output of the status-check step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    pub status: JobStatus,
    /// The payload the poller was invoked with
    pub event: Value,
}
