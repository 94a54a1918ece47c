use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    errors::StateMachineResult,
    events::RunEvent,
    states::RunState,
    transitions::{determine_target_state, StatusMatching},
};
use crate::models::{JobHandle, JobStatus};

/// One applied transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from_state: RunState,
    pub to_state: RunState,
    pub event: String,
    pub transitioned_at: DateTime<Utc>,
}

/// In-memory state machine owned by a single orchestration run
#[derive(Debug, Clone)]
pub struct RunStateMachine {
    handle: JobHandle,
    matching: StatusMatching,
    current: RunState,
    last_status: Option<JobStatus>,
    history: Vec<TransitionRecord>,
}

impl RunStateMachine {
    /// Create a new run state machine in the initial state
    pub fn new(handle: JobHandle, matching: StatusMatching) -> Self {
        Self {
            handle,
            matching,
            current: RunState::default(),
            last_status: None,
            history: Vec::new(),
        }
    }

    /// Apply an event, returning the new state
    pub fn transition(&mut self, event: RunEvent) -> StateMachineResult<RunState> {
        let from_state = self.current;
        let to_state = determine_target_state(from_state, &event, self.matching)?;

        if let Some(status) = event.status() {
            self.last_status = Some(status);
        }

        debug!(
            transaction_id = %self.handle.transaction_id,
            from_state = %from_state,
            to_state = %to_state,
            event = event.event_type(),
            "Run state transition"
        );

        self.history.push(TransitionRecord {
            from_state,
            to_state,
            event: event.event_type().to_string(),
            transitioned_at: Utc::now(),
        });
        self.current = to_state;

        Ok(to_state)
    }

    pub fn current_state(&self) -> RunState {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    pub fn last_status(&self) -> Option<JobStatus> {
        self.last_status
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Number of status checks that returned a status
    pub fn poll_count(&self) -> usize {
        self.history
            .iter()
            .filter(|record| record.from_state == RunState::CheckingStatus)
            .filter(|record| record.event == "status_reported")
            .count()
    }

    /// Every state visited so far, starting with the initial state
    pub fn visited_states(&self) -> Vec<RunState> {
        std::iter::once(RunState::default())
            .chain(self.history.iter().map(|record| record.to_state))
            .collect()
    }
}
