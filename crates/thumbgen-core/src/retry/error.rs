//! Fetch error type, classified before retry decisions and converted to anyhow at the edge.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a thumbnail fetch (transport failure, HTTP status, or storage failure).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (connection refused, DNS, timeout, ...). Not retried.
    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Final response had a non-2xx status that is not retried.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// Every attempt returned a retryable status.
    #[error("GET {url} returned HTTP {status} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },
    /// Writing the thumbnail to disk failed (permissions, disk full). Not retried.
    #[error("failed to write {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// HTTP status behind the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } | FetchError::RetriesExhausted { status, .. } => {
                Some(*status)
            }
            FetchError::Transport { .. } | FetchError::Storage { .. } => None,
        }
    }
}
