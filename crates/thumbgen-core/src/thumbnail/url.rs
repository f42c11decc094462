//! Static-image URL construction.

use crate::config::NumberFormat;
use crate::legend::LegendItem;

/// Builds `<base>/styles/<style>/static/<lng>,<lat>,<zoom>/<width>x50@2x.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplate {
    base_url: String,
    format: NumberFormat,
}

impl UrlTemplate {
    pub fn new(base_url: &str, format: NumberFormat) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            format,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, style: &str, item: &LegendItem, width: u32) -> String {
        let (lng, lat, zoom, width) = match self.format {
            NumberFormat::Plain => (
                format!("{:?}", item.latlng.lng),
                format!("{:?}", item.latlng.lat),
                item.zoom.to_string(),
                width.to_string(),
            ),
            NumberFormat::Fixed {
                coordinate_decimals,
                zoom_digits,
                width_digits,
            } => (
                format!("{:.*}", coordinate_decimals, item.latlng.lng),
                format!("{:.*}", coordinate_decimals, item.latlng.lat),
                format!("{:0w$}", item.zoom, w = zoom_digits),
                format!("{:0w$}", width, w = width_digits),
            ),
        };
        format!(
            "{}/styles/{}/static/{},{},{}/{}x50@2x.png",
            self.base_url, style, lng, lat, zoom, width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::LatLng;

    fn spring() -> LegendItem {
        LegendItem {
            key: "spring".to_string(),
            item_type: "POI".to_string(),
            latlng: LatLng { lat: 32.0, lng: 35.0 },
            zoom: 8,
        }
    }

    #[test]
    fn fixed_format_pads_and_rounds() {
        let t = UrlTemplate::new("http://localhost:8080", NumberFormat::default());
        assert_eq!(
            t.url_for("IHM", &spring(), 50),
            "http://localhost:8080/styles/IHM/static/35.0000000,32.0000000,08/050x50@2x.png"
        );
    }

    #[test]
    fn plain_format_keeps_raw_values() {
        let mut item = spring();
        item.latlng.lng = 35.123456789;
        let t = UrlTemplate::new("http://localhost:5000", NumberFormat::Plain);
        assert_eq!(
            t.url_for("ilMTB", &item, 200),
            "http://localhost:5000/styles/ilMTB/static/35.123456789,32.0,8/200x50@2x.png"
        );
    }

    #[test]
    fn trailing_slash_not_duplicated() {
        let t = UrlTemplate::new("http://tiles/", NumberFormat::Plain);
        assert_eq!(t.base_url(), "http://tiles");
        assert!(t.url_for("IHM", &spring(), 50).starts_with("http://tiles/styles/IHM/"));
    }

    #[test]
    fn negative_coordinates_fixed() {
        let mut item = spring();
        item.latlng = LatLng { lat: -33.8688, lng: 151.2093 };
        item.zoom = 14;
        let t = UrlTemplate::new("http://t", NumberFormat::default());
        assert_eq!(
            t.url_for("IHM", &item, 200),
            "http://t/styles/IHM/static/151.2093000,-33.8688000,14/200x50@2x.png"
        );
    }
}
