//! Integration tests for the run state machine: graph properties of the
//! transition function and the status-matching modes.

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use bpm_core::models::{JobHandle, JobStatus};
use bpm_core::state_machine::{
    determine_target_state, route_status, RunEvent, RunState, RunStateMachine,
    StateMachineError, StatusMatching,
};

fn new_machine(matching: StatusMatching) -> RunStateMachine {
    RunStateMachine::new(
        JobHandle {
            transaction_id: Uuid::new_v4(),
            started_at: Utc::now(),
        },
        matching,
    )
}

fn status_strategy() -> impl Strategy<Value = JobStatus> {
    prop_oneof![
        Just(JobStatus::Pending),
        Just(JobStatus::Succeeded),
        Just(JobStatus::Failed),
    ]
}

fn event_strategy() -> impl Strategy<Value = RunEvent> {
    prop_oneof![
        Just(RunEvent::Submitted),
        "[a-z ]{1,16}".prop_map(RunEvent::SubmissionFailed),
        Just(RunEvent::DelayElapsed),
        status_strategy().prop_map(RunEvent::StatusReported),
        "[a-z ]{1,16}".prop_map(RunEvent::PollFailed),
        Just(RunEvent::TimedOut),
    ]
}

fn state_strategy() -> impl Strategy<Value = RunState> {
    prop_oneof![
        Just(RunState::Submitting),
        Just(RunState::Waiting),
        Just(RunState::CheckingStatus),
        Just(RunState::Succeeded),
        Just(RunState::Failed),
    ]
}

fn matching_strategy() -> impl Strategy<Value = StatusMatching> {
    prop_oneof![Just(StatusMatching::Strict), Just(StatusMatching::LegacyLiteral)]
}

proptest! {
    /// Property: no event ever leaves a terminal state
    #[test]
    fn terminal_states_are_never_exited(
        state in prop_oneof![Just(RunState::Succeeded), Just(RunState::Failed)],
        event in event_strategy(),
        matching in matching_strategy(),
    ) {
        let result = determine_target_state(state, &event, matching);
        let is_invalid_transition = matches!(result, Err(StateMachineError::InvalidTransition { .. }));
        prop_assert!(is_invalid_transition);
    }

    /// Property: every accepted transition follows an edge of the state graph
    #[test]
    fn accepted_transitions_follow_graph_edges(
        state in state_strategy(),
        event in event_strategy(),
        matching in matching_strategy(),
    ) {
        if let Ok(next) = determine_target_state(state, &event, matching) {
            prop_assert!(state.can_transition_to(next), "{} -> {} is not an edge", state, next);
        }
    }

    /// Property: any event sequence drives the machine along a path in the graph
    #[test]
    fn visited_states_form_a_path(
        events in proptest::collection::vec(event_strategy(), 0..40),
        matching in matching_strategy(),
    ) {
        let mut machine = new_machine(matching);
        for event in events {
            let before = machine.current_state();
            if machine.transition(event).is_err() {
                prop_assert_eq!(machine.current_state(), before);
            }
        }

        let visited = machine.visited_states();
        prop_assert_eq!(visited[0], RunState::Submitting);
        for pair in visited.windows(2) {
            prop_assert!(pair[0].can_transition_to(pair[1]));
        }
        // Terminal states can only appear last
        for state in &visited[..visited.len() - 1] {
            prop_assert!(!state.is_terminal());
        }
    }

    /// Property: FAILED is terminal in one cycle no matter how many loops preceded it
    #[test]
    fn failed_status_ends_the_run_after_any_number_of_loops(
        loops in 0usize..50,
        matching in matching_strategy(),
    ) {
        let mut machine = new_machine(matching);
        machine.transition(RunEvent::Submitted).unwrap();
        for _ in 0..loops {
            machine.transition(RunEvent::DelayElapsed).unwrap();
            machine.transition(RunEvent::StatusReported(JobStatus::Pending)).unwrap();
        }
        machine.transition(RunEvent::DelayElapsed).unwrap();
        let final_state = machine.transition(RunEvent::StatusReported(JobStatus::Failed)).unwrap();

        prop_assert_eq!(final_state, RunState::Failed);
        prop_assert_eq!(machine.poll_count(), loops + 1);
    }
}

#[test]
fn test_strict_matching_reaches_succeeded_in_one_cycle() {
    let mut machine = new_machine(StatusMatching::Strict);
    machine.transition(RunEvent::Submitted).unwrap();
    machine.transition(RunEvent::DelayElapsed).unwrap();
    machine
        .transition(RunEvent::StatusReported(JobStatus::Succeeded))
        .unwrap();

    assert!(machine.is_terminal());
    assert_eq!(
        machine.visited_states(),
        vec![
            RunState::Submitting,
            RunState::Waiting,
            RunState::CheckingStatus,
            RunState::Succeeded
        ]
    );
    assert_eq!(machine.last_status(), Some(JobStatus::Succeeded));
}

#[test]
fn test_legacy_literal_never_recognises_success() {
    assert_eq!(
        route_status(JobStatus::Succeeded, StatusMatching::LegacyLiteral),
        RunState::Waiting
    );

    let mut machine = new_machine(StatusMatching::LegacyLiteral);
    machine.transition(RunEvent::Submitted).unwrap();
    for _ in 0..5 {
        machine.transition(RunEvent::DelayElapsed).unwrap();
        let next = machine
            .transition(RunEvent::StatusReported(JobStatus::Succeeded))
            .unwrap();
        assert_eq!(next, RunState::Waiting);
    }
    assert_eq!(machine.poll_count(), 5);

    // Only the overall budget ends such a run
    assert_eq!(
        machine.transition(RunEvent::TimedOut).unwrap(),
        RunState::Failed
    );
}

#[test]
fn test_catch_transitions_fail_the_run() {
    let mut submitting = new_machine(StatusMatching::Strict);
    assert_eq!(
        submitting
            .transition(RunEvent::SubmissionFailed("rejected".into()))
            .unwrap(),
        RunState::Failed
    );

    let mut checking = new_machine(StatusMatching::Strict);
    checking.transition(RunEvent::Submitted).unwrap();
    checking.transition(RunEvent::DelayElapsed).unwrap();
    assert_eq!(
        checking
            .transition(RunEvent::PollFailed("unreachable".into()))
            .unwrap(),
        RunState::Failed
    );
    assert_eq!(checking.poll_count(), 0);
}

#[test]
fn test_invalid_transition_error_names_state_and_event() {
    let error = determine_target_state(
        RunState::Waiting,
        &RunEvent::Submitted,
        StatusMatching::Strict,
    )
    .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Invalid state transition from waiting on event submitted"
    );
}
