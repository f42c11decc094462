//! Classify HTTP statuses and fetch errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::{ErrorKind, RetryPolicy};

/// Classify a non-success HTTP status code for retry decisions.
pub fn classify_http_status(code: u16, policy: &RetryPolicy) -> ErrorKind {
    if policy.retries_status(code) {
        ErrorKind::RetryableStatus(code)
    } else {
        ErrorKind::Other
    }
}

/// Classify a fetch error. Only retryable statuses are ever worth another attempt.
pub fn classify(e: &FetchError, policy: &RetryPolicy) -> ErrorKind {
    match e {
        FetchError::Status { status, .. } => classify_http_status(*status, policy),
        FetchError::Transport { .. }
        | FetchError::RetriesExhausted { .. }
        | FetchError::Storage { .. } => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_statuses_retryable() {
        let p = RetryPolicy::default();
        for code in [502, 503, 504] {
            assert_eq!(classify_http_status(code, &p), ErrorKind::RetryableStatus(code));
        }
    }

    #[test]
    fn other_statuses_not_retryable() {
        let p = RetryPolicy::default();
        assert_eq!(classify_http_status(500, &p), ErrorKind::Other);
        assert_eq!(classify_http_status(404, &p), ErrorKind::Other);
        assert_eq!(classify_http_status(429, &p), ErrorKind::Other);
    }

    #[test]
    fn storage_error_not_retryable() {
        let p = RetryPolicy::default();
        let e = FetchError::Storage {
            path: "IHM_spring.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(classify(&e, &p), ErrorKind::Other);
    }
}
