//! Legend document model: sections of map-symbol entries that need thumbnails.
//!
//! Items are validated up front so that a bad entry aborts the run before any
//! request goes out.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LegendError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("legend is not a list of sections")]
    Document(#[source] serde_json::Error),
    #[error("section {section} item {item} is invalid")]
    Item {
        section: usize,
        item: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("section {section} item {item} ({key}): coordinates must be finite")]
    Coordinates {
        section: usize,
        item: usize,
        key: String,
    },
    #[error("invalid {what} {value:?}: {reason}")]
    InvalidName {
        what: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One map-symbol entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub key: String,
    /// Symbol category; `"POI"` entries get a narrow thumbnail.
    #[serde(rename = "type")]
    pub item_type: String,
    pub latlng: LatLng,
    pub zoom: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSection {
    pub key: Option<String>,
    pub items: Vec<LegendItem>,
}

#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    key: Option<String>,
    items: Vec<serde_json::Value>,
}

/// Parsed `legend.json`. Read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendDocument {
    pub sections: Vec<LegendSection>,
}

impl LegendDocument {
    pub fn load(path: &Path) -> Result<Self, LegendError> {
        let data = std::fs::read_to_string(path).map_err(|source| LegendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, LegendError> {
        let raw: Vec<RawSection> = serde_json::from_str(data).map_err(LegendError::Document)?;
        let mut sections = Vec::with_capacity(raw.len());
        for (si, section) in raw.into_iter().enumerate() {
            let mut items = Vec::with_capacity(section.items.len());
            for (ii, value) in section.items.into_iter().enumerate() {
                let item: LegendItem =
                    serde_json::from_value(value).map_err(|source| LegendError::Item {
                        section: si,
                        item: ii,
                        source,
                    })?;
                check_name("legend key", &item.key)?;
                if !item.latlng.lat.is_finite() || !item.latlng.lng.is_finite() {
                    return Err(LegendError::Coordinates {
                        section: si,
                        item: ii,
                        key: item.key,
                    });
                }
                items.push(item);
            }
            sections.push(LegendSection {
                key: section.key,
                items,
            });
        }
        Ok(LegendDocument { sections })
    }

    /// All items in document order.
    pub fn items(&self) -> impl Iterator<Item = &LegendItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// Names end up verbatim in `<style>_<key>.png`, so they must not escape the output directory.
pub fn check_name(what: &'static str, value: &str) -> Result<(), LegendError> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains(['/', '\\', '\0']) {
        "must not contain path separators or NUL"
    } else {
        return Ok(());
    };
    Err(LegendError::InvalidName {
        what,
        value: value.to_string(),
        reason,
    })
}
