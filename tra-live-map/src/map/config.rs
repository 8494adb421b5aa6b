//! Map rendering configuration.

/// Fixed view and styling parameters for the rendered map.
///
/// The view is never derived from the data: an empty live board still shows
/// the whole island at the configured zoom.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Page title.
    pub title: String,

    /// Initial map centre latitude (degrees).
    pub center_lat: f64,

    /// Initial map centre longitude (degrees).
    pub center_lon: f64,

    /// Initial zoom level.
    pub zoom: u8,

    /// Leaflet tile URL template.
    pub tile_url: String,

    /// Tile attribution (HTML).
    pub tile_attribution: String,

    /// Trains delayed by more than this many minutes are shown as delayed.
    pub delay_threshold_minutes: i64,
}

impl MapConfig {
    /// Set the initial view.
    pub fn with_center(mut self, lat: f64, lon: f64, zoom: u8) -> Self {
        self.center_lat = lat;
        self.center_lon = lon;
        self.zoom = zoom;
        self
    }

    /// Set the delay threshold in minutes.
    pub fn with_delay_threshold(mut self, minutes: i64) -> Self {
        self.delay_threshold_minutes = minutes;
        self
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "TRA Live Train Map".to_string(),
            // Centre of Taiwan
            center_lat: 23.5,
            center_lon: 121.0,
            zoom: 7,
            // CartoDB dark_matter
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>".to_string(),
            delay_threshold_minutes: 5,
        }
    }
}
