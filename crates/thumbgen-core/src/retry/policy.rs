use crate::config::RetryConfig;
use std::time::Duration;

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Response status listed in the policy's retryable set.
    RetryableStatus(u16),
    /// Any other failure (other statuses, connection errors, timeouts).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Status-driven exponential backoff.
///
/// The first retry is immediate; retry `n` (n >= 2) waits
/// `backoff_factor * 2^(n-1)`, capped at `max_backoff`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Backoff factor; with 1s the schedule is 0s, 2s, 4s, 8s, 16s.
    pub backoff_factor: Duration,
    /// Upper bound on a single backoff sleep.
    pub max_backoff: Duration,
    /// HTTP statuses that trigger a retry.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(120),
            retry_statuses: vec![502, 503, 504],
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(r: &RetryConfig) -> Self {
        Self {
            max_retries: r.max_retries,
            backoff_factor: Duration::try_from_secs_f64(r.backoff_factor_secs)
                .unwrap_or(Duration::ZERO),
            max_backoff: Duration::from_secs(r.max_backoff_secs),
            retry_statuses: r.statuses.clone(),
        }
    }
}

impl RetryPolicy {
    /// True when `code` is in the retryable status set.
    pub fn retries_status(&self, code: u16) -> bool {
        self.retry_statuses.contains(&code)
    }

    /// Total number of requests made for a status that never recovers.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sleep before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exp = 1u32 << (retry - 1).min(16);
        self.backoff_factor.saturating_mul(exp).min(self.max_backoff)
    }

    /// Decide whether to make retry number `retry` (1-based) after a failure of `kind`.
    pub fn decide(&self, retry: u32, kind: ErrorKind) -> RetryDecision {
        if retry > self.max_retries {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::RetryableStatus(_) => RetryDecision::RetryAfter(self.backoff(retry)),
        }
    }
}
