//! # System Constants
//!
//! Literal values shared by the ingress adapter, the orchestrator and the
//! demo step handlers. Anything an operator is expected to tune lives in
//! [`crate::config`] instead; these are the defaults it falls back to.

/// Lifecycle events published on the in-process event bus
pub mod events {
    pub const SERVICE_STATUS: &str = "service_status";
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_TRANSITIONED: &str = "run.transitioned";
    pub const RUN_SUCCEEDED: &str = "run.succeeded";
    pub const RUN_FAILED: &str = "run.failed";
}

/// Orchestration input defaults
pub mod workflow {
    use std::time::Duration;

    /// Event source stamped on every workflow input
    pub const DEFAULT_EVENT_SOURCE: &str = "com.mycompany.myapp";

    /// Detail type stamped on every workflow input
    pub const DEFAULT_DETAIL_TYPE: &str = "service_status";

    /// Name of the run definition handed to the launcher
    pub const DEFINITION_NAME: &str = "price_appeal_status_flow";

    pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);
    pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

    /// How long a finished run stays visible to status lookups
    pub const DEFAULT_RUN_RETENTION: Duration = Duration::from_secs(60 * 60);

    /// Period of the sweep that drops expired runs from the registry
    pub const REGISTRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

    /// Success literal the legacy branch table compares against.
    ///
    /// Misspelled on purpose. Deployed workflow definitions carry this literal
    /// and [`crate::state_machine::StatusMatching::LegacyLiteral`] matches it
    /// verbatim.
    pub const LEGACY_SUCCESS_LITERAL: &str = "SUCCEDED";

    /// Cause recorded when a job reports FAILED
    pub const BUSINESS_FAILURE_CAUSE: &str = "Data Producer Failed";

    /// Error recorded when a job reports FAILED
    pub const BUSINESS_FAILURE_ERROR: &str = "Job returned as failed";
}

/// HTTP surface
pub mod http {
    pub const ITEMS_PATH: &str = "/items";
    pub const RUNS_PATH: &str = "/v1/runs/{transaction_id}";
    pub const HEALTH_PATH: &str = "/health";

    /// Value of the `result` field in the ingress acknowledgment
    pub const ACK_RESULT: &str = "from Producer";

    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
    pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
}

/// Retry defaults for submitter and poller calls
pub mod retry {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY_MS: u64 = 200;
    pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_JITTER_FACTOR: f64 = 0.1;

    /// Largest accepted `retry.max_attempts`
    pub const MAX_ATTEMPTS_LIMIT: u32 = 100;
    /// Largest accepted `retry.backoff_multiplier`
    pub const MAX_BACKOFF_MULTIPLIER: f64 = 10.0;
}

/// Default broadcast capacity of the event bus
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;
