//! CLI for the thumbgen legend thumbnail fetcher.

mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use thumbgen_core::config::{self, ThumbgenConfig};

use commands::run_fetch;

/// Download a PNG thumbnail for every legend item in every map style.
#[derive(Debug, Parser)]
#[command(name = "thumbgen")]
#[command(
    about = "Fetch map legend thumbnails from a static tile-image endpoint",
    long_about = None
)]
pub struct Cli {
    /// Only generate files whose name (`<style>_<key>.png`) contains this substring.
    pub filter: Option<String>,

    /// Legend definition file.
    #[arg(long, default_value = "legend.json", value_name = "PATH")]
    pub legend: PathBuf,

    /// Directory to write thumbnails into (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Read configuration from this TOML file instead of ~/.config/thumbgen/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tile server base URL, overriding the configured one.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Map style to render (repeatable), overriding the configured list.
    #[arg(long = "style", value_name = "STYLE")]
    pub styles: Vec<String>,

    /// Keep fetching after a failed item and report all failures at the end.
    #[arg(long)]
    pub keep_going: bool,

    /// Print the URLs and filenames that would be fetched, without any network or disk I/O.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        let cfg = cli.apply_overrides(cfg);
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg);

        run_fetch(&cli, &cfg)
    }

    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, mut cfg: ThumbgenConfig) -> ThumbgenConfig {
        if let Some(base_url) = &self.base_url {
            cfg.base_url = base_url.clone();
        }
        if !self.styles.is_empty() {
            cfg.styles = self.styles.clone();
        }
        cfg
    }
}

#[cfg(test)]
mod tests;
