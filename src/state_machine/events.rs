use serde::{Deserialize, Serialize};

use crate::models::JobStatus;

/// Events that drive run state transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RunEvent {
    /// Submitter returned a result
    Submitted,
    /// Submitter failed after retries
    SubmissionFailed(String),
    /// The inter-poll delay elapsed
    DelayElapsed,
    /// Poller returned a status
    StatusReported(JobStatus),
    /// Poller failed after retries
    PollFailed(String),
    /// The overall run budget was exhausted
    TimedOut,
}

impl RunEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::DelayElapsed => "delay_elapsed",
            Self::StatusReported(_) => "status_reported",
            Self::PollFailed(_) => "poll_failed",
            Self::TimedOut => "timed_out",
        }
    }

    /// Extract error message if this is a step failure event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::SubmissionFailed(msg) | Self::PollFailed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Reported status, if this event carries one
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            Self::StatusReported(status) => Some(*status),
            _ => None,
        }
    }
}
