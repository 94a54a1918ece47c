//! # Web State
//!
//! Shared state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::config::BpmConfig;
use crate::events::EventPublisher;
use crate::orchestration::{RunLauncher, RunRegistry};

pub struct AppState {
    pub launcher: Arc<dyn RunLauncher>,
    pub registry: Arc<RunRegistry>,
    pub publisher: EventPublisher,
    /// Stamped on every ingress event
    pub event_source: String,
    pub detail_type: String,
    pub request_timeout: Duration,
    pub environment: String,
}

impl AppState {
    pub fn new(
        config: &BpmConfig,
        environment: impl Into<String>,
        launcher: Arc<dyn RunLauncher>,
        registry: Arc<RunRegistry>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            launcher,
            registry,
            publisher,
            event_source: config.workflow.event_source.clone(),
            detail_type: config.workflow.detail_type.clone(),
            request_timeout: config.server.request_timeout(),
            environment: environment.into(),
        }
    }
}
