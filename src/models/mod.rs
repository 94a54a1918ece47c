//! # Data Model
//!
//! Value types that flow through an orchestration run:
//!
//! - [`WorkflowEvent`] - run input built by the ingress adapter
//! - [`JobRequest`] / [`JobHandle`] - the opaque payload and its correlation handle
//! - [`JobStatus`] - the enumerated status every branch decision is made on
//! - [`SubmissionResult`] / [`PollResult`] - step outputs

pub mod job;
pub mod workflow_event;

pub use job::{JobHandle, JobRequest, JobStatus, PollResult, SubmissionRequest, SubmissionResult};
pub use workflow_event::WorkflowEvent;
