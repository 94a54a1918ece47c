//! # Configuration System
//!
//! YAML-based configuration with environment-specific overrides.
//!
//! ## Architecture
//!
//! - **Single file**: `config/bpm-config.yaml` (or `.yml`)
//! - **Environment Awareness**: top-level `development` / `test` / `production`
//!   sections are deep-merged over the base values
//! - **Explicit Validation**: invalid values are rejected, never silently clamped
//! - **Defaults**: every section is optional; omitted keys take the values in
//!   [`crate::constants`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bpm_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let wait = manager.config().workflow.wait();
//! let timeout = manager.config().workflow.run_timeout();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{self, http, retry, workflow};
use crate::state_machine::StatusMatching;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring bpm-config.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BpmConfig {
    /// HTTP ingress settings
    pub server: ServerConfig,

    /// Orchestration timing and branching
    pub workflow: WorkflowConfig,

    /// Backoff for submitter and poller calls
    pub retry: RetryConfig,

    /// In-process event bus
    pub events: EventsConfig,

    /// Logging output
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
    /// Admission cap on concurrently executing runs; unbounded when absent
    pub max_concurrent_runs: Option<usize>,
    /// Seconds a finished run stays queryable before it is evicted
    pub run_retention_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: http::DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout_ms: http::DEFAULT_REQUEST_TIMEOUT_MS,
            max_concurrent_runs: None,
            run_retention_seconds: workflow::DEFAULT_RUN_RETENTION.as_secs(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn run_retention(&self) -> Duration {
        Duration::from_secs(self.run_retention_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Delay between status checks
    pub wait_seconds: u64,
    /// Overall budget of one run
    pub run_timeout_seconds: u64,
    /// Budget of a single submitter or poller call
    pub step_timeout_seconds: u64,
    pub status_matching: StatusMatching,
    pub event_source: String,
    pub detail_type: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            wait_seconds: workflow::DEFAULT_WAIT.as_secs(),
            run_timeout_seconds: workflow::DEFAULT_RUN_TIMEOUT.as_secs(),
            step_timeout_seconds: workflow::DEFAULT_STEP_TIMEOUT.as_secs(),
            status_matching: StatusMatching::Strict,
            event_source: workflow::DEFAULT_EVENT_SOURCE.to_string(),
            detail_type: workflow::DEFAULT_DETAIL_TYPE.to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_seconds)
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Upper bound of the random extra delay, as a fraction of the computed delay
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: retry::DEFAULT_BASE_DELAY_MS,
            max_delay_ms: retry::DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: retry::DEFAULT_BACKOFF_MULTIPLIER,
            jitter_factor: retry::DEFAULT_JITTER_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: constants::DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl BpmConfig {
    /// Reject values the orchestrator cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "server.bind_address",
                self.server.bind_address.clone(),
                "bind address cannot be empty",
            ));
        }

        if self.server.max_concurrent_runs == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "server.max_concurrent_runs",
                "0",
                "admission cap must allow at least one run; omit it for unbounded",
            ));
        }

        if self.workflow.wait_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "workflow.wait_seconds",
                "0",
                "a zero delay turns the poll loop into a busy loop",
            ));
        }

        if self.workflow.run_timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "workflow.run_timeout_seconds",
                "0",
                "run timeout must be positive",
            ));
        }

        if self.workflow.step_timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "workflow.step_timeout_seconds",
                "0",
                "step timeout must be positive",
            ));
        }

        if !(1..=retry::MAX_ATTEMPTS_LIMIT).contains(&self.retry.max_attempts) {
            return Err(ConfigurationError::invalid_value(
                "retry.max_attempts",
                self.retry.max_attempts.to_string(),
                format!(
                    "attempts must be within 1..={}",
                    retry::MAX_ATTEMPTS_LIMIT
                ),
            ));
        }

        if !(1.0..=retry::MAX_BACKOFF_MULTIPLIER).contains(&self.retry.backoff_multiplier) {
            return Err(ConfigurationError::invalid_value(
                "retry.backoff_multiplier",
                self.retry.backoff_multiplier.to_string(),
                format!(
                    "multiplier must be within 1.0..={}",
                    retry::MAX_BACKOFF_MULTIPLIER
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ConfigurationError::invalid_value(
                "retry.jitter_factor",
                self.retry.jitter_factor.to_string(),
                "jitter factor must be within 0.0..=1.0",
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.channel_capacity",
                "0",
                "event bus capacity must be positive",
            ));
        }

        Ok(())
    }
}
