//! End-to-end run behaviour on a paused clock.

use futures::future::join_all;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

use bpm_core::constants::events;
use bpm_core::models::{JobRequest, JobStatus, WorkflowEvent};
use bpm_core::orchestration::{OrchestrationLauncher, RunFailure, RunOutcome};
use bpm_core::state_machine::{RunState, StatusMatching};

use crate::common::{
    build_orchestrator, default_settings, AcceptingSubmitter, FailingSubmitter, FlakySubmitter,
    HangingPoller, ScriptedPoller, UnreachablePoller,
};

fn input(detail: &str) -> WorkflowEvent {
    WorkflowEvent::with_defaults(JobRequest::new(detail))
}

fn assert_elapsed_about(actual: Duration, expected_secs: u64) {
    assert!(
        actual >= Duration::from_secs(expected_secs)
            && actual < Duration::from_secs(expected_secs + 1),
        "expected ~{expected_secs}s, got {actual:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_succeeded_status_completes_in_one_cycle() {
    let poller = Arc::new(ScriptedPoller::always(JobStatus::Succeeded));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-1")).await;

    assert_eq!(report.final_state, RunState::Succeeded);
    assert_eq!(
        report.visited_states,
        vec![
            RunState::Submitting,
            RunState::Waiting,
            RunState::CheckingStatus,
            RunState::Succeeded
        ]
    );
    assert_eq!(poller.call_count(), 1);
    assert_elapsed_about(report.elapsed, 10);

    match report.outcome {
        RunOutcome::Succeeded { result } => assert_eq!(result.status, JobStatus::Succeeded),
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_poll_receives_submission_and_later_polls_receive_previous_result() {
    let poller = Arc::new(ScriptedPoller::new([
        JobStatus::Pending,
        JobStatus::Succeeded,
    ]));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-2")).await;
    assert!(report.outcome.is_success());

    let payloads = poller.payloads.lock().unwrap().clone();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0]["statusCode"], json!(200));
    assert_eq!(payloads[1]["status"], json!("PENDING"));
    assert_eq!(payloads[1]["event"], payloads[0]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_after_loops_is_a_business_failure() {
    let poller = Arc::new(ScriptedPoller::new([
        JobStatus::Pending,
        JobStatus::Pending,
        JobStatus::Pending,
        JobStatus::Failed,
    ]));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );
    let run = input("item-3");
    let transaction_id = run.transaction_id;

    let report = harness.orchestrator.execute(run).await;

    assert_eq!(report.final_state, RunState::Failed);
    assert_eq!(report.poll_count, 4);
    assert_elapsed_about(report.elapsed, 40);
    match report.outcome.failure() {
        Some(RunFailure::Business { cause, error }) => {
            assert_eq!(cause, "Data Producer Failed");
            assert_eq!(error, "Job returned as failed");
        }
        other => panic!("expected business failure, got {other:?}"),
    }

    let snapshot = harness.registry.get(&transaction_id).unwrap();
    assert_eq!(snapshot.state, RunState::Failed);
    assert_eq!(snapshot.last_status, Some(JobStatus::Failed));
    assert_eq!(snapshot.poll_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_perpetual_pending_times_out_at_budget() {
    let poller = Arc::new(ScriptedPoller::always(JobStatus::Pending));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );
    let run = input("item-4");
    let transaction_id = run.transaction_id;

    let report = harness.orchestrator.execute(run).await;

    assert_eq!(report.final_state, RunState::Failed);
    assert_eq!(report.outcome.failure(), Some(&RunFailure::timeout(300_000)));
    assert_elapsed_about(report.elapsed, 300);
    assert!((29..=30).contains(&poller.call_count()));

    let snapshot = harness.registry.get(&transaction_id).unwrap();
    assert!(snapshot.failure.unwrap().is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_legacy_literal_success_loops_until_timeout() {
    let poller = Arc::new(ScriptedPoller::always(JobStatus::Succeeded));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::LegacyLiteral),
    );

    let report = harness.orchestrator.execute(input("item-5")).await;

    assert_eq!(report.final_state, RunState::Failed);
    assert!(report.outcome.failure().unwrap().is_timeout());
    assert_elapsed_about(report.elapsed, 300);
    assert!(poller.call_count() >= 29);
}

#[tokio::test(start_paused = true)]
async fn test_legacy_literal_still_honours_failed() {
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        Arc::new(ScriptedPoller::always(JobStatus::Failed)),
        default_settings(StatusMatching::LegacyLiteral),
    );

    let report = harness.orchestrator.execute(input("item-6")).await;

    assert_eq!(report.outcome.failure(), Some(&RunFailure::business()));
    assert_eq!(report.poll_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_budget_is_respected() {
    let mut settings = default_settings(StatusMatching::Strict);
    settings.wait = Duration::from_secs(30);
    settings.run_timeout = Duration::from_secs(95);
    let poller = Arc::new(ScriptedPoller::always(JobStatus::Pending));
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        settings,
    );

    let report = harness.orchestrator.execute(input("item-7")).await;

    assert_eq!(report.outcome.failure(), Some(&RunFailure::timeout(95_000)));
    assert_elapsed_about(report.elapsed, 95);
    assert_eq!(poller.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_submission_failure_is_not_retried() {
    let submitter = Arc::new(FailingSubmitter::default());
    let poller = Arc::new(ScriptedPoller::always(JobStatus::Succeeded));
    let harness = build_orchestrator(
        submitter.clone(),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-8")).await;

    assert_eq!(report.final_state, RunState::Failed);
    assert_eq!(
        report.visited_states,
        vec![RunState::Submitting, RunState::Failed]
    );
    assert!(matches!(
        report.outcome.failure(),
        Some(RunFailure::Submission { .. })
    ));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(poller.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_submission_failures_are_retried() {
    let submitter = Arc::new(FlakySubmitter::new(2));
    let harness = build_orchestrator(
        submitter.clone(),
        Arc::new(ScriptedPoller::always(JobStatus::Succeeded)),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-9")).await;

    assert!(report.outcome.is_success());
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_submission_retries_fail_the_run() {
    let submitter = Arc::new(FlakySubmitter::new(10));
    let harness = build_orchestrator(
        submitter.clone(),
        Arc::new(ScriptedPoller::always(JobStatus::Succeeded)),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-10")).await;

    assert!(matches!(
        report.outcome.failure(),
        Some(RunFailure::Submission { .. })
    ));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_poller_fails_after_retries() {
    let poller = Arc::new(UnreachablePoller::default());
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-11")).await;

    assert_eq!(
        report.visited_states,
        vec![
            RunState::Submitting,
            RunState::Waiting,
            RunState::CheckingStatus,
            RunState::Failed
        ]
    );
    match report.outcome.failure() {
        Some(RunFailure::Poll { error }) => assert!(error.contains("connection refused")),
        other => panic!("expected poll failure, got {other:?}"),
    }
    assert_eq!(poller.calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.poll_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_poller_is_cut_off_by_step_timeout() {
    let poller = Arc::new(HangingPoller::default());
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        default_settings(StatusMatching::Strict),
    );

    let report = harness.orchestrator.execute(input("item-12")).await;

    match report.outcome.failure() {
        Some(RunFailure::Poll { error }) => assert!(error.contains("timed out")),
        other => panic!("expected poll timeout, got {other:?}"),
    }
    assert_eq!(poller.calls.load(Ordering::SeqCst), 3);
    // 10 s wait plus three 30 s attempts, well inside the run budget
    assert!(report.elapsed < Duration::from_secs(101));
}

#[tokio::test(start_paused = true)]
async fn test_run_budget_expires_during_a_hanging_poll() {
    let mut settings = default_settings(StatusMatching::Strict);
    settings.run_timeout = Duration::from_secs(25);
    let poller = Arc::new(HangingPoller::default());
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        poller.clone(),
        settings,
    );

    let report = harness.orchestrator.execute(input("item-13")).await;

    // The budget ends inside the first 30 s poll attempt
    assert_eq!(report.outcome.failure(), Some(&RunFailure::timeout(25_000)));
    assert_eq!(report.final_state, RunState::Failed);
    let visited = &report.visited_states;
    assert_eq!(
        &visited[visited.len() - 2..],
        &[RunState::CheckingStatus, RunState::Failed]
    );
    assert_eq!(poller.calls.load(Ordering::SeqCst), 1);
    assert_elapsed_about(report.elapsed, 25);

    let snapshot = harness
        .registry
        .get(&report.handle.transaction_id)
        .unwrap();
    assert!(snapshot.failure.unwrap().is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_lifecycle_events_are_published_in_order() {
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        Arc::new(ScriptedPoller::always(JobStatus::Succeeded)),
        default_settings(StatusMatching::Strict),
    );
    let mut receiver = harness.publisher.subscribe();

    let report = harness.orchestrator.execute(input("item-13")).await;
    assert!(report.outcome.is_success());

    let mut names = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        names.push(event.name);
    }

    assert_eq!(
        names,
        vec![
            events::RUN_STARTED,
            events::RUN_TRANSITIONED,
            events::RUN_TRANSITIONED,
            events::RUN_TRANSITIONED,
            events::RUN_SUCCEEDED,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_runs_are_independent() {
    let harness = build_orchestrator(
        Arc::new(AcceptingSubmitter::default()),
        Arc::new(ScriptedPoller::always(JobStatus::Succeeded)),
        default_settings(StatusMatching::Strict),
    );
    let launcher = OrchestrationLauncher::new(harness.orchestrator.clone());

    let mut joins = Vec::new();
    for i in 0..5 {
        let (_, join) = assert_ok!(launcher.spawn_run(input(&format!("item-{i}"))));
        joins.push(join);
    }

    let reports = join_all(joins).await;
    assert_eq!(reports.len(), 5);
    for report in reports {
        let report = assert_ok!(report);
        assert!(report.outcome.is_success());
        assert_elapsed_about(report.elapsed, 10);
    }
    assert_eq!(harness.registry.len(), 5);
    assert_eq!(harness.registry.active_count(), 0);
}
