//! Data transfer objects for web responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::map::MapDocument;

/// Summary of the latest refresh cycle.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// When the current document was generated
    pub generated_at: DateTime<Utc>,

    /// Number of train markers on the map
    pub markers: usize,

    /// Failure reason if the last cycle failed
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn from_document(document: &MapDocument) -> Self {
        Self {
            generated_at: document.generated_at(),
            markers: document.marker_count(),
            error: document.failure().map(str::to_string),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
