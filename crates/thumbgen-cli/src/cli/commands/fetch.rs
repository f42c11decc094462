//! Fetch command: load the legend and download every matching thumbnail.

use crate::cli::Cli;
use anyhow::{Context, Result};
use thumbgen_core::config::ThumbgenConfig;
use thumbgen_core::fetcher::{FailurePolicy, FetchEvent, FetchOptions, Fetcher};
use thumbgen_core::http::ThumbClient;
use thumbgen_core::legend::LegendDocument;
use thumbgen_core::thumbnail::UrlTemplate;

/// `outer: inner: innermost`, like anyhow's alternate display.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cur = e.source();
    }
    out
}

/// Per-item progress line for stderr (stdout for dry runs).
pub(crate) fn progress_line(ev: &FetchEvent<'_>) -> String {
    match ev {
        FetchEvent::Planned { url, filename } => format!("{} -> {}", url, filename),
        FetchEvent::Fetched {
            url,
            filename,
            status,
            ..
        } => format!("{} -> {} ({})", url, filename, status),
        FetchEvent::Failed {
            url,
            filename,
            error,
        } => format!("{} -> {} (failed: {})", url, filename, error_chain(*error)),
    }
}

pub fn run_fetch(cli: &Cli, cfg: &ThumbgenConfig) -> Result<()> {
    let legend = LegendDocument::load(&cli.legend)
        .with_context(|| format!("cannot use legend {}", cli.legend.display()))?;
    tracing::info!(
        sections = legend.sections.len(),
        items = legend.item_count(),
        "loaded legend {}",
        cli.legend.display()
    );

    let out_dir = match &cli.out_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let opts = FetchOptions {
        out_dir,
        filter: cli.filter.clone().unwrap_or_default(),
        failure_policy: if cli.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        },
        dry_run: cli.dry_run,
    };

    let client = ThumbClient::from_config(cfg);
    let template = UrlTemplate::new(&cfg.base_url, cfg.url_format);
    let fetcher = Fetcher::new(&client, template, cfg.styles.clone());

    let report = fetcher.run(&legend, &opts, |ev| match ev {
        FetchEvent::Planned { .. } => println!("{}", progress_line(ev)),
        _ => eprintln!("{}", progress_line(ev)),
    })?;

    eprintln!("{}", report.summary());
    if !report.is_success() {
        for failure in &report.failed {
            eprintln!("  {}", error_chain(failure));
        }
        anyhow::bail!(
            "{} of {} thumbnails failed",
            report.failed.len(),
            report.planned
        );
    }
    Ok(())
}
