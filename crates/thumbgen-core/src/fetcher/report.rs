//! Per-item outcomes collected over one run.

use crate::retry::FetchError;
use crate::thumbnail::ThumbnailJob;
use std::path::PathBuf;
use thiserror::Error;

/// A thumbnail written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSuccess {
    pub style: String,
    pub key: String,
    pub url: String,
    pub path: PathBuf,
    pub status: u16,
    pub attempts: u32,
    pub bytes: usize,
    pub sha256: String,
}

/// A thumbnail that could not be fetched or written, with the offending item.
#[derive(Debug, Error)]
#[error("{style}/{key} ({filename})")]
pub struct ItemFailure {
    pub style: String,
    pub key: String,
    pub url: String,
    pub filename: String,
    #[source]
    pub error: FetchError,
}

impl ItemFailure {
    pub(crate) fn new(job: &ThumbnailJob<'_>, error: FetchError) -> Self {
        Self {
            style: job.style.to_string(),
            key: job.item.key.clone(),
            url: job.url.clone(),
            filename: job.filename.clone(),
            error,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Jobs left after the filter.
    pub planned: usize,
    pub dry_run: bool,
    pub succeeded: Vec<ItemSuccess>,
    pub failed: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.dry_run {
            return format!("{} thumbnails planned (dry run)", self.planned);
        }
        let mut s = format!(
            "{} of {} thumbnails written",
            self.succeeded.len(),
            self.planned
        );
        if !self.failed.is_empty() {
            s.push_str(&format!(", {} failed", self.failed.len()));
        }
        s
    }
}
