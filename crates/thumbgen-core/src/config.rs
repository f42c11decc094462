use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::legend;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first request.
    pub max_retries: u32,
    /// Backoff factor in seconds (retry n waits factor * 2^(n-1), the first retry is immediate).
    pub backoff_factor_secs: f64,
    /// Maximum single backoff delay in seconds.
    pub max_backoff_secs: u64,
    /// HTTP statuses that are retried.
    pub statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor_secs: 1.0,
            max_backoff_secs: 120,
            statuses: vec![502, 503, 504],
        }
    }
}

/// How coordinates, zoom and width are rendered into the static-image path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NumberFormat {
    /// Shortest float rendering that keeps a decimal point; integers unpadded.
    Plain,
    /// Fixed decimals for lng/lat, zero-padded zoom and width.
    Fixed {
        coordinate_decimals: usize,
        zoom_digits: usize,
        width_digits: usize,
    },
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Fixed {
            coordinate_decimals: 7,
            zoom_digits: 2,
            width_digits: 3,
        }
    }
}

/// Global configuration loaded from `~/.config/thumbgen/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbgenConfig {
    /// Tile server base, e.g. `http://localhost:8080`. `/styles/...` is appended.
    pub base_url: String,
    /// Map styles to render, in order.
    pub styles: Vec<String>,
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request timeout in seconds (None = no timeout).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Connect timeout in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub url_format: NumberFormat,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_user_agent() -> String {
    concat!("thumbgen/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ThumbgenConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            styles: vec!["IHM".to_string(), "ilMTB".to_string()],
            user_agent: default_user_agent(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
            url_format: NumberFormat::default(),
            retry: Some(RetryConfig::default()),
        }
    }
}

impl ThumbgenConfig {
    /// Reject values that would produce bad URLs, stray paths or a panicking backoff.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("base_url must be http or https, got {}", parsed.scheme());
        }
        if self.styles.is_empty() {
            anyhow::bail!("at least one style is required");
        }
        for style in &self.styles {
            legend::check_name("style", style)?;
        }
        if let Some(r) = &self.retry {
            if !r.backoff_factor_secs.is_finite() || r.backoff_factor_secs < 0.0 {
                anyhow::bail!(
                    "retry.backoff_factor_secs must be a non-negative number, got {}",
                    r.backoff_factor_secs
                );
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("thumbgen")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ThumbgenConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ThumbgenConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<ThumbgenConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ThumbgenConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
