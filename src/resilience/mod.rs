//! # Resilience Module
//!
//! Bounded retry with exponential backoff for step calls. Submitter and
//! poller invocations are point-in-time calls that may fail transiently; the
//! orchestrator wraps each one in a [`RetryPolicy`] before escalating the
//! failure to the run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bpm_core::resilience::{RetryPolicy, Retryable};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Flaky;
//! impl std::fmt::Display for Flaky {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("flaky") }
//! }
//! impl Retryable for Flaky {
//!     fn is_retryable(&self) -> bool { true }
//! }
//!
//! # async fn example() -> Result<(), Flaky> {
//! let policy = RetryPolicy::new(3, Duration::from_millis(200), Duration::from_secs(5), 2.0, 0.1);
//! let value = policy.execute("status_check", |_attempt| async { Ok::<_, Flaky>(42) }).await?;
//! # Ok(())
//! # }
//! ```

pub mod retry;

pub use retry::{RetryPolicy, Retryable};
