//! Application state for the web layer.

use std::sync::Arc;

use crate::refresh::LatestMap;

/// Shared application state.
///
/// Handlers only read the latest published document; all pipeline work
/// happens in the refresh task.
#[derive(Clone)]
pub struct AppState {
    /// Most recent map document
    pub latest: LatestMap,

    /// Page title
    pub title: Arc<str>,

    /// How often the host page reloads the map, in milliseconds
    pub refresh_ms: u64,
}

impl AppState {
    /// Create a new app state.
    pub fn new(latest: LatestMap, title: impl Into<Arc<str>>, refresh_ms: u64) -> Self {
        Self {
            latest,
            title: title.into(),
            refresh_ms,
        }
    }
}
