//! Deadline enforcement for CMS calls.
//!
//! # Responsibilities
//! - Race an in-flight CMS future against a deadline
//! - Report the loser as a distinct `Raced::TimedOut` value
//! - Substitute a caller-supplied default when the deadline wins
//!
//! # Design Decisions
//! - Uses Tokio's timer facilities
//! - The timeout sentinel is an enum variant, so no content value can collide with it
//! - By default the losing future is detached and runs to completion in the
//!   background; `TimeoutPolicy::Cancel` drops it at the deadline instead

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::metrics;

/// Deadline applied to every CMS call unless configured otherwise.
pub const DEFAULT_TIMEOUT_MS: u64 = 4000;

/// What happens to a CMS call that loses the race against its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Spawn the call; on timeout it keeps running and its output is discarded.
    #[default]
    Detach,
    /// Drop the call at the deadline, aborting any in-flight request.
    Cancel,
}

/// Outcome of racing a future against a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Raced<T> {
    /// The future resolved first.
    Completed(T),
    /// The deadline elapsed first.
    TimedOut,
}

impl<T> Raced<T> {
    /// True when the deadline won.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Raced::TimedOut)
    }

    /// The resolved value, if the future won.
    pub fn completed(self) -> Option<T> {
        match self {
            Raced::Completed(value) => Some(value),
            Raced::TimedOut => None,
        }
    }

    /// The resolved value, or `default` if the deadline won.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Raced::Completed(value) => value,
            Raced::TimedOut => default,
        }
    }
}

/// A deadline plus the policy for calls that miss it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Racer {
    deadline: Duration,
    policy: TimeoutPolicy,
}

impl Racer {
    /// Create a racer with an explicit deadline and policy.
    pub fn new(deadline: Duration, policy: TimeoutPolicy) -> Self {
        Self { deadline, policy }
    }

    /// Create a detaching racer with a deadline in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms), TimeoutPolicy::Detach)
    }

    /// The configured deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// The configured deadline in whole milliseconds.
    pub fn deadline_ms(&self) -> u64 {
        u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX)
    }

    /// The policy applied to calls that miss the deadline.
    pub fn policy(&self) -> TimeoutPolicy {
        self.policy
    }

    /// Race `fut` against the deadline.
    ///
    /// Never fails on its own account: an `Err` produced by `fut` is returned
    /// as `Raced::Completed(Err(..))`. A panic inside a detached call is
    /// resumed on the caller.
    pub async fn race<F>(&self, fut: F) -> Raced<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let outcome = match self.policy {
            TimeoutPolicy::Cancel => match tokio::time::timeout(self.deadline, fut).await {
                Ok(value) => Raced::Completed(value),
                Err(_) => Raced::TimedOut,
            },
            TimeoutPolicy::Detach => {
                let mut handle = tokio::spawn(fut);
                match tokio::time::timeout(self.deadline, &mut handle).await {
                    Ok(Ok(value)) => Raced::Completed(value),
                    Ok(Err(join_error)) if join_error.is_panic() => {
                        std::panic::resume_unwind(join_error.into_panic())
                    }
                    // Task cancelled underneath us (runtime shutting down).
                    Ok(Err(_)) => Raced::TimedOut,
                    // Dropping the handle detaches the task; it runs to completion.
                    Err(_) => Raced::TimedOut,
                }
            }
        };

        if outcome.is_timed_out() {
            tracing::debug!(
                deadline_ms = self.deadline_ms(),
                policy = ?self.policy,
                "CMS call exceeded deadline"
            );
            metrics::record_timeout();
        }
        outcome
    }

    /// Race `fut` against the deadline, returning `default` if the deadline wins.
    ///
    /// The timeout sentinel never escapes this function.
    pub async fn with_fallback<F>(&self, fut: F, default: F::Output) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.race(fut).await.unwrap_or(default)
    }
}

impl Default for Racer {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TIMEOUT_MS)
    }
}

/// Race `fut` against `deadline` with the given policy.
pub async fn race<F>(fut: F, deadline: Duration, policy: TimeoutPolicy) -> Raced<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    Racer::new(deadline, policy).race(fut).await
}
