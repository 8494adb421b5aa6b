//! Askama templates for the host page.

use askama::Template;

/// Host page: a title and an iframe with the live map, reloaded in place on
/// a timer.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub refresh_ms: u64,
}
