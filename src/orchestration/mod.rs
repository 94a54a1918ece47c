//! # Orchestration Engine
//!
//! Runs the price-appeal status flow: submit a job, wait, check its status,
//! and branch on the reported status until the run succeeds, fails, or
//! exhausts its time budget.
//!
//! ## Core Components
//!
//! - **Orchestrator**: Sequences the steps of one run through the run state machine
//! - **OrchestrationLauncher**: Starts runs on background tasks with optional admission control
//! - **RunRegistry**: Last-known state of every run for status lookups
//! - **JobSubmitter / StatusPoller**: The step contracts backends implement
//! - **BpmSystemHandle**: Wires the components and the web application together
//! - **Demo handlers**: Mock submitter and echo poller used by the bundled server

pub mod bootstrap;
pub mod demo_handlers;
pub mod launcher;
pub mod orchestrator;
pub mod run_registry;
pub mod steps;
pub mod types;

// Re-export core types and components for easy access
pub use bootstrap::BpmSystemHandle;
pub use demo_handlers::{EchoStatusPoller, MockPriceAppealSubmitter};
pub use launcher::{LaunchError, OrchestrationLauncher, RunLauncher};
pub use orchestrator::{Orchestrator, OrchestratorSettings};
pub use run_registry::{RunRegistry, RunSnapshot};
pub use steps::{JobSubmitter, StatusPoller, StepContext, StepError, STATUS_STEP, SUBMIT_STEP};
pub use types::{RunFailure, RunOutcome, RunReport};
