//! Thumbnail fetcher: walks styles × legend items, downloads each thumbnail and
//! writes it next to its siblings as `<style>_<key>.png`.
//!
//! Runs strictly sequentially. By default the first failing item aborts the
//! run; files already written stay on disk.

mod report;

pub use report::{BatchReport, ItemFailure, ItemSuccess};

use crate::checksum;
use crate::http::ThumbClient;
use crate::legend::LegendDocument;
use crate::retry::FetchError;
use crate::storage;
use crate::thumbnail::{self, ThumbnailJob, UrlTemplate};
use std::path::PathBuf;

/// What to do when one item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Record the failure and continue with the next item.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Directory the PNGs are written to.
    pub out_dir: PathBuf,
    /// Substring filter on destination filenames; empty = everything.
    pub filter: String,
    pub failure_policy: FailurePolicy,
    /// Plan and report only; no requests, no writes.
    pub dry_run: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            filter: String::new(),
            failure_policy: FailurePolicy::FailFast,
            dry_run: false,
        }
    }
}

/// Progress notification, one per item.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// Dry run: this thumbnail would be fetched.
    Planned { url: &'a str, filename: &'a str },
    Fetched {
        url: &'a str,
        filename: &'a str,
        status: u16,
        attempts: u32,
    },
    Failed {
        url: &'a str,
        filename: &'a str,
        error: &'a FetchError,
    },
}

pub struct Fetcher<'c> {
    client: &'c ThumbClient,
    template: UrlTemplate,
    styles: Vec<String>,
}

impl<'c> Fetcher<'c> {
    pub fn new(client: &'c ThumbClient, template: UrlTemplate, styles: Vec<String>) -> Self {
        Self {
            client,
            template,
            styles,
        }
    }

    /// Jobs this fetcher would run for `legend` under `filter`.
    pub fn plan<'a>(&'a self, legend: &'a LegendDocument, filter: &str) -> Vec<ThumbnailJob<'a>> {
        thumbnail::plan(legend, &self.styles, &self.template, filter)
    }

    /// Fetch every planned thumbnail, reporting each item through `on_event`.
    ///
    /// Under [`FailurePolicy::FailFast`] the first failure is returned as `Err`;
    /// under [`FailurePolicy::KeepGoing`] failures land in the report instead.
    pub fn run<F>(
        &self,
        legend: &LegendDocument,
        opts: &FetchOptions,
        mut on_event: F,
    ) -> Result<BatchReport, ItemFailure>
    where
        F: FnMut(&FetchEvent<'_>),
    {
        let jobs = self.plan(legend, &opts.filter);
        tracing::info!(
            planned = jobs.len(),
            styles = ?self.styles,
            filter = %opts.filter,
            dry_run = opts.dry_run,
            "starting thumbnail run"
        );
        let mut report = BatchReport {
            planned: jobs.len(),
            dry_run: opts.dry_run,
            ..BatchReport::default()
        };

        for job in &jobs {
            if opts.dry_run {
                on_event(&FetchEvent::Planned {
                    url: &job.url,
                    filename: &job.filename,
                });
                continue;
            }
            match self.fetch_one(job, opts) {
                Ok(success) => {
                    on_event(&FetchEvent::Fetched {
                        url: &job.url,
                        filename: &job.filename,
                        status: success.status,
                        attempts: success.attempts,
                    });
                    report.succeeded.push(success);
                }
                Err(error) => {
                    on_event(&FetchEvent::Failed {
                        url: &job.url,
                        filename: &job.filename,
                        error: &error,
                    });
                    let failure = ItemFailure::new(job, error);
                    match opts.failure_policy {
                        FailurePolicy::FailFast => return Err(failure),
                        FailurePolicy::KeepGoing => {
                            tracing::warn!("{}", failure);
                            report.failed.push(failure);
                        }
                    }
                }
            }
        }

        tracing::info!("{}", report.summary());
        Ok(report)
    }

    fn fetch_one(&self, job: &ThumbnailJob<'_>, opts: &FetchOptions) -> Result<ItemSuccess, FetchError> {
        let response = self.client.get(&job.url)?;
        let path = opts.out_dir.join(&job.filename);
        storage::write_file(&path, &response.body).map_err(|source| FetchError::Storage {
            path: path.clone(),
            source,
        })?;
        let sha256 = checksum::sha256_bytes(&response.body);
        tracing::debug!(
            filename = %job.filename,
            bytes = response.body.len(),
            %sha256,
            "thumbnail written"
        );
        Ok(ItemSuccess {
            style: job.style.to_string(),
            key: job.item.key.clone(),
            url: job.url.clone(),
            path,
            status: response.status,
            attempts: response.attempts,
            bytes: response.body.len(),
            sha256,
        })
    }
}
