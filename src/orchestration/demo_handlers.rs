//! Mock backends wired into the demo deployment.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::steps::{JobSubmitter, StatusPoller, StepContext, StepError};
use crate::models::{JobHandle, JobStatus, PollResult, SubmissionRequest, SubmissionResult};

/// Price-appeal submitter stub: logs the input and always reports success
#[derive(Debug, Default, Clone)]
pub struct MockPriceAppealSubmitter;

#[async_trait]
impl JobSubmitter for MockPriceAppealSubmitter {
    async fn submit(
        &self,
        ctx: &StepContext,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, StepError> {
        info!(
            parent: &ctx.span,
            idempotency_key = %request.idempotency_key,
            source = %request.input.source,
            detail = %request.input.detail.as_str(),
            "Submitting price appeal"
        );

        Ok(SubmissionResult {
            status_code: 200,
            status: JobStatus::Succeeded,
            body: json!({"result": "testing..."}).to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "mock_price_appeal_submitter"
    }
}

/// Status-check stub: echoes `payload.status` back as SUCCEEDED or FAILED.
///
/// It never changes state over time; progressing from PENDING to a terminal
/// status is the job backend's responsibility.
#[derive(Debug, Default, Clone)]
pub struct EchoStatusPoller;

#[async_trait]
impl StatusPoller for EchoStatusPoller {
    async fn poll(
        &self,
        ctx: &StepContext,
        handle: &JobHandle,
        payload: &Value,
    ) -> Result<PollResult, StepError> {
        let status = match payload.get("status").and_then(Value::as_str) {
            Some("SUCCEEDED") => JobStatus::Succeeded,
            _ => JobStatus::Failed,
        };

        info!(
            parent: &ctx.span,
            transaction_id = %handle.transaction_id,
            status = %status,
            "Checked job status"
        );

        Ok(PollResult {
            status,
            event: payload.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "echo_status_poller"
    }
}
