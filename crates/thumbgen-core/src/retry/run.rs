//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Successful result together with the number of requests it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    pub value: T,
    pub attempts: u32,
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
///
/// A retryable status that is still failing when the budget runs out is
/// reported as [`FetchError::RetriesExhausted`].
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<Attempted<T>, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match f() {
            Ok(value) => return Ok(Attempted { value, attempts }),
            Err(e) => {
                let kind = classify::classify(&e, policy);
                match policy.decide(attempts, kind) {
                    RetryDecision::NoRetry => return Err(exhausted(e, kind, attempts)),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(attempt = attempts, delay_ms = d.as_millis() as u64, "{}; retrying", e);
                        std::thread::sleep(d);
                    }
                }
            }
        }
    }
}

fn exhausted(e: FetchError, kind: ErrorKind, attempts: u32) -> FetchError {
    match (e, kind) {
        (FetchError::Status { url, status }, ErrorKind::RetryableStatus(_)) => {
            FetchError::RetriesExhausted {
                url,
                status,
                attempts,
            }
        }
        (e, _) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            backoff_factor: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    fn status(code: u16) -> FetchError {
        FetchError::Status {
            url: "http://tiles/x.png".to_string(),
            status: code,
        }
    }

    #[test]
    fn recovers_after_two_gateway_errors() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(), || {
            calls += 1;
            if calls < 3 {
                Err(status(503))
            } else {
                Ok("body")
            }
        })
        .unwrap();
        assert_eq!(out.value, "body");
        assert_eq!(out.attempts, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn internal_server_error_is_not_retried() {
        let mut calls = 0;
        let err = run_with_retry::<(), _>(&fast_policy(), || {
            calls += 1;
            Err(status(500))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[test]
    fn gives_up_after_max_retries() {
        let mut calls = 0;
        let err = run_with_retry::<(), _>(&fast_policy(), || {
            calls += 1;
            Err(status(502))
        })
        .unwrap_err();
        assert_eq!(calls, 6);
        match err {
            FetchError::RetriesExhausted {
                status, attempts, ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(attempts, 6);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }
}
