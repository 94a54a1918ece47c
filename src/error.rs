//! Error types for the workflow engine.
//!
//! Each layer owns a narrow error enum (`StateMachineError`, `StepError`,
//! `LaunchError`, `ConfigurationError`, `ApiError`); `BpmError` is the
//! crate-wide umbrella they all convert into.

use crate::config::ConfigurationError;
use crate::orchestration::launcher::LaunchError;
use crate::orchestration::steps::StepError;
use crate::state_machine::errors::StateMachineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BpmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),
    #[error("Step error: {0}")]
    Step(#[from] StepError),
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BpmResult<T> = std::result::Result<T, BpmError>;
