//! Thumbnail derivation: width, filename and URL for every (style, item) pair.

mod filter;
mod url;

pub use filter::matches_filter;
pub use url::UrlTemplate;

use crate::legend::{LegendDocument, LegendItem};

/// Width for POI symbols; everything else (lines, areas) gets the wide strip.
pub const POI_WIDTH: u32 = 50;
pub const DEFAULT_WIDTH: u32 = 200;

pub fn thumbnail_width(item_type: &str) -> u32 {
    if item_type == "POI" {
        POI_WIDTH
    } else {
        DEFAULT_WIDTH
    }
}

pub fn thumbnail_filename(style: &str, key: &str) -> String {
    format!("{}_{}.png", style, key)
}

/// One thumbnail to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailJob<'a> {
    pub style: &'a str,
    pub item: &'a LegendItem,
    pub width: u32,
    pub url: String,
    pub filename: String,
}

impl<'a> ThumbnailJob<'a> {
    pub fn new(style: &'a str, item: &'a LegendItem, template: &UrlTemplate) -> Self {
        let width = thumbnail_width(&item.item_type);
        Self {
            style,
            item,
            width,
            url: template.url_for(style, item, width),
            filename: thumbnail_filename(style, &item.key),
        }
    }
}

/// Every job in run order (style-major, then document order) that passes `filter`.
pub fn plan<'a, S: AsRef<str>>(
    legend: &'a LegendDocument,
    styles: &'a [S],
    template: &UrlTemplate,
    filter: &str,
) -> Vec<ThumbnailJob<'a>> {
    let mut jobs = Vec::new();
    for style in styles {
        for item in legend.items() {
            let job = ThumbnailJob::new(style.as_ref(), item, template);
            if matches_filter(filter, &job.filename) {
                jobs.push(job);
            } else {
                tracing::trace!(filename = %job.filename, "skipped by filter");
            }
        }
    }
    jobs
}
