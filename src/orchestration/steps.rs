//! # Step Contracts
//!
//! The two collaborators every run calls: a [`JobSubmitter`] invoked once at
//! the start, and a [`StatusPoller`] invoked once per poll cycle. Both receive
//! a [`StepContext`] carrying the run's tracing span, so handlers log into the
//! run they serve instead of a process-wide logger.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info_span, Span};

use crate::models::{JobHandle, PollResult, SubmissionRequest, SubmissionResult};
use crate::resilience::Retryable;

pub const SUBMIT_STEP: &str = "submit_job";
pub const STATUS_STEP: &str = "check_status";

/// Per-invocation context handed to step handlers
#[derive(Debug, Clone)]
pub struct StepContext {
    pub handle: JobHandle,
    pub step_name: &'static str,
    /// 1-based attempt number within the current retry sequence
    pub attempt: u32,
    /// Span scoped to this invocation, parented to the run span
    pub span: Span,
}

impl StepContext {
    /// Create a context whose span is a child of the current span
    pub fn new(handle: JobHandle, step_name: &'static str, attempt: u32) -> Self {
        let span = info_span!(
            "step",
            step = step_name,
            attempt = attempt,
            transaction_id = %handle.transaction_id
        );
        Self {
            handle,
            step_name,
            attempt,
            span,
        }
    }
}

/// Failures raised by step handlers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error("{step} failed transiently: {message}")]
    Transient { step: String, message: String },

    #[error("{step} failed: {message}")]
    Permanent { step: String, message: String },

    #[error("{step} timed out after {timeout:?}")]
    Timeout { step: String, timeout: Duration },
}

impl StepError {
    pub fn transient(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn permanent(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Permanent {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn timeout(step: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            step: step.into(),
            timeout,
        }
    }
}

impl Retryable for StepError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Timeout { .. })
    }
}

/// Performs the "submit" side effect for a job
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submit a job. May be called more than once with the same
    /// `request.idempotency_key` when the orchestrator retries.
    async fn submit(
        &self,
        ctx: &StepContext,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, StepError>;

    fn name(&self) -> &'static str;
}

/// Reads the current status of a submitted job
#[async_trait]
pub trait StatusPoller: Send + Sync {
    /// Query job status. `payload` is the previous step's output: the
    /// submission result on the first cycle, the last poll result afterwards.
    async fn poll(
        &self,
        ctx: &StepContext,
        handle: &JobHandle,
        payload: &Value,
    ) -> Result<PollResult, StepError>;

    fn name(&self) -> &'static str;
}
