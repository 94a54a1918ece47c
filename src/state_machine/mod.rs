// State machine module for orchestration runs
//
// The status branch is expressed here as a
// pure transition function over enumerated states, events and statuses, so
// every routing decision is testable without a scheduler or a backend.

pub mod errors;
pub mod events;
pub mod run_state_machine;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::RunEvent;
pub use run_state_machine::{RunStateMachine, TransitionRecord};
pub use states::RunState;
pub use transitions::{determine_target_state, route_status, StatusMatching};
