//! Askama templates for the rendered map documents.

use askama::Template;

use super::config::MapConfig;
use super::render::MarkerView;

/// The live map: tiles, clustered train markers and their popups.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate<'a> {
    pub config: &'a MapConfig,
    pub markers: &'a [MarkerView],
    pub generated_at: String,
}

/// Notice shown in place of the map (failed or pending refresh).
#[derive(Template)]
#[template(path = "notice.html")]
pub struct NoticeTemplate<'a> {
    pub title: &'a str,
    pub heading: &'a str,
    pub message: &'a str,
    pub generated_at: String,
}
