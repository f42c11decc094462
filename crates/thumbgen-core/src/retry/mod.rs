//! Retry and backoff policy.
//!
//! Thumbnail requests are retried only when the tile server answers with one
//! of a fixed set of gateway statuses (502/503/504 by default). Everything
//! else, including transport failures, surfaces to the caller on the first
//! attempt.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Attempted};
