//! # Orchestrator
//!
//! Drives one run through `Submitting → Waiting → CheckingStatus → {Succeeded | Failed}`.
//!
//! ## Execution model
//!
//! - Every routing decision goes through [`RunStateMachine::transition`]; the
//!   orchestrator only sequences calls and feeds the results back as events.
//! - Waiting is a `tokio::time::sleep`, the only suspension point of a run.
//! - Submitter and poller calls are each bounded by the step timeout and
//!   retried per the [`RetryPolicy`].
//! - The whole run is bounded by the run timeout. On expiry the in-flight step
//!   is dropped and the run is failed with [`RunFailure::Timeout`].

use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

use super::run_registry::RunRegistry;
use super::steps::{
    JobSubmitter, StatusPoller, StepContext, StepError, STATUS_STEP, SUBMIT_STEP,
};
use super::types::{RunFailure, RunOutcome, RunReport};
use crate::config::BpmConfig;
use crate::constants::events;
use crate::events::EventPublisher;
use crate::models::{JobHandle, PollResult, SubmissionRequest, WorkflowEvent};
use crate::resilience::RetryPolicy;
use crate::state_machine::{RunEvent, RunState, RunStateMachine, StatusMatching};

/// Timing and branching settings of the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub wait: Duration,
    pub run_timeout: Duration,
    pub step_timeout: Duration,
    pub status_matching: StatusMatching,
}

impl From<&BpmConfig> for OrchestratorSettings {
    fn from(config: &BpmConfig) -> Self {
        Self {
            wait: config.workflow.wait(),
            run_timeout: config.workflow.run_timeout(),
            step_timeout: config.workflow.step_timeout(),
            status_matching: config.workflow.status_matching,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&BpmConfig::default())
    }
}

pub struct Orchestrator {
    submitter: Arc<dyn JobSubmitter>,
    poller: Arc<dyn StatusPoller>,
    settings: OrchestratorSettings,
    retry: RetryPolicy,
    publisher: EventPublisher,
    registry: Arc<RunRegistry>,
}

impl Orchestrator {
    pub fn new(
        submitter: Arc<dyn JobSubmitter>,
        poller: Arc<dyn StatusPoller>,
        settings: OrchestratorSettings,
        retry: RetryPolicy,
        publisher: EventPublisher,
        registry: Arc<RunRegistry>,
    ) -> Self {
        Self {
            submitter,
            poller,
            settings,
            retry,
            publisher,
            registry,
        }
    }

    /// Build an orchestrator from loaded configuration
    pub fn from_config(
        config: &BpmConfig,
        submitter: Arc<dyn JobSubmitter>,
        poller: Arc<dyn StatusPoller>,
        publisher: EventPublisher,
        registry: Arc<RunRegistry>,
    ) -> Self {
        Self::new(
            submitter,
            poller,
            OrchestratorSettings::from(config),
            RetryPolicy::from(&config.retry),
            publisher,
            registry,
        )
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    /// Execute one run to a terminal state
    pub async fn execute(&self, input: WorkflowEvent) -> RunReport {
        let handle = input.handle();
        let span = info_span!(
            "orchestration_run",
            transaction_id = %handle.transaction_id,
            source = %input.source,
            detail_type = %input.detail_type
        );

        self.run_to_completion(handle, input).instrument(span).await
    }

    async fn run_to_completion(&self, handle: JobHandle, input: WorkflowEvent) -> RunReport {
        let started = Instant::now();
        let mut machine = RunStateMachine::new(handle, self.settings.status_matching);

        self.registry.register(&handle);
        self.emit(events::RUN_STARTED, json!({ "input": &input }));
        info!(
            submitter = self.submitter.name(),
            poller = self.poller.name(),
            wait_ms = self.settings.wait.as_millis() as u64,
            run_timeout_ms = self.settings.run_timeout.as_millis() as u64,
            "Orchestration run started"
        );

        let driven = tokio::time::timeout(
            self.settings.run_timeout,
            self.drive(&mut machine, &input),
        )
        .await;

        let outcome = match driven {
            Ok(Ok(result)) => RunOutcome::Succeeded { result },
            Ok(Err(failure)) => RunOutcome::Failed(failure),
            Err(_elapsed) => {
                let failure = RunFailure::timeout(self.settings.run_timeout.as_millis() as u64);
                // Still non-terminal here; the drive future was dropped mid-step
                if let Err(e) = self.apply(&mut machine, RunEvent::TimedOut) {
                    error!(error = ?e, "Failed to record run timeout");
                }
                RunOutcome::Failed(failure)
            }
        };

        self.finish(machine, outcome, started.elapsed())
    }

    /// Sequence the steps; returns the final poll result on success
    async fn drive(
        &self,
        machine: &mut RunStateMachine,
        input: &WorkflowEvent,
    ) -> Result<PollResult, RunFailure> {
        let handle = *machine.handle();

        let request = SubmissionRequest::for_input(input.clone());
        let submitter = self.submitter.clone();
        let submission = self
            .call_step(SUBMIT_STEP, &handle, |ctx| {
                let submitter = submitter.clone();
                let request = &request;
                async move { submitter.submit(&ctx, request).await }
            })
            .await;

        let submission = match submission {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.apply(machine, RunEvent::SubmissionFailed(e.to_string()))?;
                return Err(RunFailure::Submission {
                    error: e.to_string(),
                });
            }
        };
        self.apply(machine, RunEvent::Submitted)?;

        let mut payload = serde_json::to_value(&submission).map_err(|e| RunFailure::Internal {
            error: e.to_string(),
        })?;

        loop {
            tokio::time::sleep(self.settings.wait).await;
            self.apply(machine, RunEvent::DelayElapsed)?;

            let poller = self.poller.clone();
            let polled = self
                .call_step(STATUS_STEP, &handle, |ctx| {
                    let poller = poller.clone();
                    let payload = &payload;
                    async move { poller.poll(&ctx, &handle, payload).await }
                })
                .await;

            let poll = match polled {
                Ok(poll) => poll,
                Err(e) => {
                    warn!(error = %e, "Status check failed");
                    self.apply(machine, RunEvent::PollFailed(e.to_string()))?;
                    return Err(RunFailure::Poll {
                        error: e.to_string(),
                    });
                }
            };

            match self.apply(machine, RunEvent::StatusReported(poll.status))? {
                RunState::Succeeded => return Ok(poll),
                RunState::Failed => return Err(RunFailure::business()),
                _ => {
                    payload = serde_json::to_value(&poll).map_err(|e| RunFailure::Internal {
                        error: e.to_string(),
                    })?;
                }
            }
        }
    }

    /// Invoke a step with per-call timeout and bounded retry
    async fn call_step<T, F, Fut>(
        &self,
        step_name: &'static str,
        handle: &JobHandle,
        mut operation: F,
    ) -> Result<T, StepError>
    where
        F: FnMut(StepContext) -> Fut,
        Fut: Future<Output = Result<T, StepError>>,
    {
        let step_timeout = self.settings.step_timeout;
        self.retry
            .execute(step_name, |attempt| {
                let ctx = StepContext::new(*handle, step_name, attempt);
                let span = ctx.span.clone();
                let call = operation(ctx);
                async move {
                    match tokio::time::timeout(step_timeout, call).await {
                        Ok(result) => result,
                        Err(_) => Err(StepError::timeout(step_name, step_timeout)),
                    }
                }
                .instrument(span)
            })
            .await
    }

    /// Apply an event and mirror the new state to the registry and event bus
    fn apply(
        &self,
        machine: &mut RunStateMachine,
        event: RunEvent,
    ) -> Result<RunState, RunFailure> {
        let from_state = machine.current_state();
        let event_type = event.event_type();

        let to_state = machine.transition(event).map_err(|e| {
            error!(error = %e, "Rejected run transition");
            RunFailure::Internal {
                error: e.to_string(),
            }
        })?;

        self.registry.record_transition(machine);
        self.emit(
            events::RUN_TRANSITIONED,
            json!({
                "transaction_id": machine.handle().transaction_id,
                "from_state": from_state,
                "to_state": to_state,
                "event": event_type,
            }),
        );

        Ok(to_state)
    }

    fn finish(&self, machine: RunStateMachine, outcome: RunOutcome, elapsed: Duration) -> RunReport {
        let handle = *machine.handle();

        match &outcome {
            RunOutcome::Succeeded { result } => {
                info!(
                    final_status = %result.status,
                    polls = machine.poll_count(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Orchestration run succeeded"
                );
                self.emit(
                    events::RUN_SUCCEEDED,
                    json!({ "transaction_id": handle.transaction_id, "result": result }),
                );
            }
            RunOutcome::Failed(failure) => {
                self.registry
                    .record_failure(&handle.transaction_id, failure.clone());
                warn!(
                    failure = failure.kind(),
                    polls = machine.poll_count(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Orchestration run failed"
                );
                self.emit(
                    events::RUN_FAILED,
                    json!({ "transaction_id": handle.transaction_id, "failure": failure }),
                );
            }
        }

        RunReport {
            handle,
            final_state: machine.current_state(),
            visited_states: machine.visited_states(),
            poll_count: machine.poll_count(),
            outcome,
            elapsed,
        }
    }

    fn emit(&self, event_name: &str, context: serde_json::Value) {
        if let Err(e) = self.publisher.publish(event_name, context) {
            warn!(event = event_name, error = %e, "Failed to publish lifecycle event");
        }
    }
}
