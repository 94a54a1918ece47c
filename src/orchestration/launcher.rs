//! # Run Launcher
//!
//! Starts orchestration runs in the background on behalf of the ingress. The
//! caller gets the run's handle back immediately; the run itself continues on
//! its own task until it reaches a terminal state.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::orchestrator::Orchestrator;
use super::types::RunReport;
use crate::constants::workflow::DEFINITION_NAME;
use crate::models::{JobHandle, WorkflowEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("Run admission limit reached ({limit} concurrent runs)")]
    AtCapacity { limit: usize },

    #[error("Run rejected: {0}")]
    Rejected(String),
}

/// Fire-and-forget entry point used by the HTTP ingress
#[async_trait]
pub trait RunLauncher: Send + Sync {
    /// Start a run and return without waiting for it to finish
    async fn start_run(&self, input: WorkflowEvent) -> Result<JobHandle, LaunchError>;
}

#[derive(Debug, Clone)]
struct Admission {
    permits: Arc<Semaphore>,
    limit: usize,
}

/// Launcher spawning one tokio task per run
pub struct OrchestrationLauncher {
    orchestrator: Arc<Orchestrator>,
    admission: Option<Admission>,
}

impl OrchestrationLauncher {
    /// Unbounded launcher
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            admission: None,
        }
    }

    /// Launcher refusing new runs while `limit` runs are in flight
    pub fn with_max_concurrent_runs(orchestrator: Arc<Orchestrator>, limit: usize) -> Self {
        Self {
            orchestrator,
            admission: Some(Admission {
                permits: Arc::new(Semaphore::new(limit)),
                limit,
            }),
        }
    }

    /// Build from the optional configured cap
    pub fn from_limit(orchestrator: Arc<Orchestrator>, limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => Self::with_max_concurrent_runs(orchestrator, limit),
            None => Self::new(orchestrator),
        }
    }

    /// Spawn a run and hand back its join handle alongside the run handle
    pub fn spawn_run(
        &self,
        input: WorkflowEvent,
    ) -> Result<(JobHandle, JoinHandle<RunReport>), LaunchError> {
        let permit = match &self.admission {
            Some(admission) => match admission.permits.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!(
                        limit = admission.limit,
                        "Rejecting run, admission limit reached"
                    );
                    return Err(LaunchError::AtCapacity {
                        limit: admission.limit,
                    });
                }
            },
            None => None,
        };

        let handle = input.handle();
        // Visible to status lookups before the task is first polled
        self.orchestrator.registry().register(&handle);

        info!(
            definition = DEFINITION_NAME,
            transaction_id = %handle.transaction_id,
            "Launching orchestration run"
        );

        let orchestrator = self.orchestrator.clone();
        let join = tokio::spawn(async move {
            let _permit = permit;
            orchestrator.execute(input).await
        });

        Ok((handle, join))
    }

    pub fn available_permits(&self) -> Option<usize> {
        self.admission
            .as_ref()
            .map(|admission| admission.permits.available_permits())
    }
}

#[async_trait]
impl RunLauncher for OrchestrationLauncher {
    async fn start_run(&self, input: WorkflowEvent) -> Result<JobHandle, LaunchError> {
        self.spawn_run(input).map(|(handle, _join)| handle)
    }
}
