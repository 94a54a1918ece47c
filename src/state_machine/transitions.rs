//! Pure transition function for orchestration runs.
//!
//! `(RunState, RunEvent) -> RunState`, parameterised by how the branch after
//! a status check compares the reported status.

use serde::{Deserialize, Serialize};

use super::errors::{StateMachineError, StateMachineResult};
use super::events::RunEvent;
use super::states::RunState;
use crate::constants::workflow::LEGACY_SUCCESS_LITERAL;
use crate::models::JobStatus;

/// How the status-check branch recognises a successful job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMatching {
    /// Exhaustive match on [`JobStatus`]
    #[default]
    Strict,
    /// Compares against the legacy branch table, whose success
    /// literal is misspelled: `SUCCEEDED` never matches it, so successful jobs
    /// keep polling until the run times out.
    LegacyLiteral,
}

/// Decide where a status check routes the run
pub fn route_status(status: JobStatus, matching: StatusMatching) -> RunState {
    match matching {
        StatusMatching::Strict => match status {
            JobStatus::Succeeded => RunState::Succeeded,
            JobStatus::Failed => RunState::Failed,
            JobStatus::Pending => RunState::Waiting,
        },
        StatusMatching::LegacyLiteral => {
            // FAILED first, then the success literal
            let literal = status.as_str();
            if literal == JobStatus::Failed.as_str() {
                RunState::Failed
            } else if literal == LEGACY_SUCCESS_LITERAL {
                RunState::Succeeded
            } else {
                RunState::Waiting
            }
        }
    }
}

/// Determine the target state based on current state and event
pub fn determine_target_state(
    current_state: RunState,
    event: &RunEvent,
    matching: StatusMatching,
) -> StateMachineResult<RunState> {
    let target = match (current_state, event) {
        (RunState::Submitting, RunEvent::Submitted) => RunState::Waiting,
        (RunState::Submitting, RunEvent::SubmissionFailed(_)) => RunState::Failed,

        (RunState::Waiting, RunEvent::DelayElapsed) => RunState::CheckingStatus,

        (RunState::CheckingStatus, RunEvent::StatusReported(status)) => {
            route_status(*status, matching)
        }
        (RunState::CheckingStatus, RunEvent::PollFailed(_)) => RunState::Failed,

        // The overall budget can expire at any non-terminal point
        (from_state, RunEvent::TimedOut) if !from_state.is_terminal() => RunState::Failed,

        (from_state, _) => {
            return Err(StateMachineError::InvalidTransition {
                from: from_state,
                event: event.event_type().to_string(),
            })
        }
    };

    Ok(target)
}
