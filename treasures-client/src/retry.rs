//! Retry state machine for the product listing
//!
//! The policy (attempt bound, backoff base) is separated from transport so
//! the sequencing is testable without a network: callers feed terminal
//! failures into [`RetryState`] and sleep for whatever delay it hands back.

use std::time::Duration;

/// How a request attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The per-attempt timeout ceiling elapsed
    Timeout,
    /// The server could not be reached at all
    Connect,
    /// The server answered with a non-success status
    Server,
}

/// Retry configuration
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first (2 means 3 attempts total)
    pub max_retries: u32,
    /// Backoff unit; the delay before retry N is `N x base_delay`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }
}

/// Progress of one retried operation
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
    last_failure: Option<FailureKind>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            last_failure: None,
        }
    }

    /// Zero-based index of the attempt currently in flight
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Total attempts this state will allow
    pub fn total_attempts(&self) -> u32 {
        self.policy.max_retries + 1
    }

    /// The most recent failure fed into the state
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    /// Record a failed attempt
    ///
    /// Returns the delay to sleep before the next attempt, or `None` when
    /// no attempts remain and the failure is terminal.
    pub fn record_failure(&mut self, kind: FailureKind) -> Option<Duration> {
        self.last_failure = Some(kind);

        if self.attempt >= self.policy.max_retries {
            return None;
        }

        self.attempt += 1;
        // Linear backoff: 1x base after the first failure, 2x after the second...
        Some(self.policy.base_delay * self.attempt)
    }
}
