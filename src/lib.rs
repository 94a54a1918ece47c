#![allow(clippy::doc_markdown)] // Allow technical terms like SUCCEEDED, PENDING in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # BPM Core
//!
//! Asynchronous job submission and status polling workflow.
//!
//! ## Overview
//!
//! An HTTP ingress accepts an item and starts one orchestration run for it.
//! Each run submits a job, waits, checks the job's status, and branches:
//! `SUCCEEDED` ends the run successfully, `FAILED` ends it as a business
//! failure, anything else goes back to waiting. A per-run time budget
//! (5 minutes by default) bounds the whole loop.
//!
//! ## Module Organization
//!
//! - [`models`] - Run input, job status and step payloads
//! - [`state_machine`] - Run states, events and the pure transition function
//! - [`orchestration`] - Orchestrator, launcher, run registry and step contracts
//! - [`resilience`] - Retry with exponential backoff for step calls
//! - [`events`] - In-process event bus
//! - [`web`] - axum ingress, status lookup and health endpoints
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bpm_core::config::{BpmConfig, ConfigManager};
//! use bpm_core::orchestration::BpmSystemHandle;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::from_config(BpmConfig::default(), "development")?;
//! let system = BpmSystemHandle::bootstrap_demo(manager);
//!
//! let listener = system.bind().await?;
//! system
//!     .serve(listener, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod resilience;
pub mod state_machine;
pub mod web;

pub use config::{BpmConfig, ConfigManager, TelemetryConfig};
pub use error::{BpmError, BpmResult};
pub use events::EventPublisher;
pub use models::{JobHandle, JobRequest, JobStatus, PollResult, SubmissionResult, WorkflowEvent};
pub use orchestration::{
    BpmSystemHandle, JobSubmitter, Orchestrator, RunFailure, RunLauncher, RunOutcome, RunReport,
    StatusPoller,
};
pub use state_machine::{RunState, StatusMatching};
