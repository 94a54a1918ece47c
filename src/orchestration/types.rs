//! Outcome types produced by the orchestrator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::workflow::{BUSINESS_FAILURE_CAUSE, BUSINESS_FAILURE_ERROR};
use crate::models::{JobHandle, PollResult};
use crate::state_machine::RunState;

/// Why a run ended in the Failed state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// The submitter failed after retries
    Submission { error: String },
    /// The poller failed after retries
    Poll { error: String },
    /// The job itself reported FAILED
    Business { cause: String, error: String },
    /// The overall run budget was exhausted
    Timeout { budget_ms: u64 },
    /// The state machine rejected a transition the orchestrator attempted
    Internal { error: String },
}

impl RunFailure {
    pub fn business() -> Self {
        Self::Business {
            cause: BUSINESS_FAILURE_CAUSE.to_string(),
            error: BUSINESS_FAILURE_ERROR.to_string(),
        }
    }

    pub fn timeout(budget_ms: u64) -> Self {
        Self::Timeout { budget_ms }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submission { .. } => "submission",
            Self::Poll { .. } => "poll",
            Self::Business { .. } => "business",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Succeeded { result: PollResult },
    Failed(RunFailure),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Succeeded { .. } => None,
        }
    }
}

/// Everything observable about a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub handle: JobHandle,
    pub outcome: RunOutcome,
    pub final_state: RunState,
    /// Path through the state graph, starting with the initial state
    pub visited_states: Vec<RunState>,
    pub poll_count: usize,
    pub elapsed: Duration,
}
