//! # Run Registry
//!
//! Last-known state of every run, keyed by transaction id. Each entry is
//! written only by the run that owns it, so runs never contend on the same
//! key; readers (the status-lookup endpoint) get point-in-time copies.
//!
//! Finished runs stay visible for the configured retention window and are
//! then dropped by [`RunRegistry::evict_expired`], which a background sweeper
//! calls periodically.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;
use uuid::Uuid;

use super::types::RunFailure;
use crate::constants::workflow;
use crate::models::{JobHandle, JobStatus};
use crate::state_machine::{RunState, RunStateMachine};

/// Read model of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub transaction_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: RunState,
    pub last_status: Option<JobStatus>,
    pub poll_count: usize,
    pub failure: Option<RunFailure>,
    pub updated_at: DateTime<Utc>,
}

impl RunSnapshot {
    fn initial(handle: &JobHandle) -> Self {
        Self {
            transaction_id: handle.transaction_id,
            started_at: handle.started_at,
            state: RunState::default(),
            last_status: None,
            poll_count: 0,
            failure: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
struct TrackedRun {
    snapshot: RunSnapshot,
    /// Set when the run first reaches a terminal state
    finished_at: Option<Instant>,
}

impl TrackedRun {
    fn new(handle: &JobHandle) -> Self {
        Self {
            snapshot: RunSnapshot::initial(handle),
            finished_at: None,
        }
    }
}

/// Runs in flight plus finished runs still inside the retention window
#[derive(Debug)]
pub struct RunRegistry {
    runs: DashMap<Uuid, TrackedRun>,
    active: AtomicUsize,
    retention: Duration,
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::with_retention(workflow::DEFAULT_RUN_RETENTION)
    }
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry keeping finished runs for `retention` after they finish
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            runs: DashMap::new(),
            active: AtomicUsize::new(0),
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Record a run in its initial state; an existing entry is kept
    pub fn register(&self, handle: &JobHandle) {
        if let Entry::Vacant(vacant) = self.runs.entry(handle.transaction_id) {
            vacant.insert(TrackedRun::new(handle));
            self.active.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Mirror the state machine after a transition
    pub fn record_transition(&self, machine: &RunStateMachine) {
        let handle = machine.handle();
        let mut run = match self.runs.entry(handle.transaction_id) {
            Entry::Occupied(occupied) => occupied.into_ref(),
            Entry::Vacant(vacant) => {
                self.active.fetch_add(1, Ordering::Relaxed);
                vacant.insert(TrackedRun::new(handle))
            }
        };

        run.snapshot.state = machine.current_state();
        run.snapshot.last_status = machine.last_status();
        run.snapshot.poll_count = machine.poll_count();
        run.snapshot.updated_at = Utc::now();

        if run.finished_at.is_none() && machine.is_terminal() {
            run.finished_at = Some(Instant::now());
            self.active.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self, transaction_id: &Uuid, failure: RunFailure) {
        if let Some(mut run) = self.runs.get_mut(transaction_id) {
            run.snapshot.failure = Some(failure);
            run.snapshot.updated_at = Utc::now();
        }
    }

    /// Look up the last-known state of a run
    pub fn get(&self, transaction_id: &Uuid) -> Option<RunSnapshot> {
        self.runs
            .get(transaction_id)
            .map(|run| run.snapshot.clone())
    }

    /// Tracked runs, finished ones included until they are evicted
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs that have not reached a terminal state
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Drop finished runs older than the retention window; returns how many went
    pub fn evict_expired(&self) -> usize {
        let before = self.runs.len();
        let retention = self.retention;
        self.runs.retain(|_, run| {
            !matches!(run.finished_at, Some(finished_at) if finished_at.elapsed() >= retention)
        });
        before.saturating_sub(self.runs.len())
    }

    /// Evict expired runs every `period` until the registry is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let Some(registry) = registry.upgrade() else {
                    break;
                };
                let evicted = registry.evict_expired();
                if evicted > 0 {
                    debug!(
                        evicted = evicted,
                        remaining = registry.len(),
                        "Evicted finished runs past retention"
                    );
                }
            }
        })
    }
}
