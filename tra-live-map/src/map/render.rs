//! Projection of joined records into map markers and documents.

use askama::Template;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::domain::JoinedRecord;

use super::config::MapConfig;
use super::error::RenderError;
use super::templates::{MapTemplate, NoticeTemplate};

/// Served if even the notice template fails to render.
const FALLBACK_HTML: &str = "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Map unavailable</title></head><body><p>Unable to update map.</p></body></html>\n";

/// Two-valued marker style derived from a train's delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStatus {
    OnTime,
    Delayed,
}

impl DelayStatus {
    /// Classify a delay against `threshold_minutes`.
    ///
    /// A missing delay counts as on time.
    pub fn classify(delay_minutes: Option<i64>, threshold_minutes: i64) -> Self {
        match delay_minutes {
            Some(delay) if delay > threshold_minutes => DelayStatus::Delayed,
            _ => DelayStatus::OnTime,
        }
    }

    /// CSS class used by the map page.
    pub fn css_class(&self) -> &'static str {
        match self {
            DelayStatus::OnTime => "on-time",
            DelayStatus::Delayed => "delayed",
        }
    }
}

/// One marker on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub latitude: f64,
    pub longitude: f64,
    pub status: DelayStatus,
    pub station_name: String,
    pub delay: String,
    pub train_no: String,
}

impl MarkerView {
    /// Build the marker for a record, or `None` if it has no position.
    pub fn from_record(record: &JoinedRecord, threshold_minutes: i64) -> Option<Self> {
        let (latitude, longitude) = record.position()?;

        Some(Self {
            latitude,
            longitude,
            status: DelayStatus::classify(record.delay_minutes, threshold_minutes),
            station_name: record
                .name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            delay: record
                .delay_minutes
                .map(|d| format!("{d} min"))
                .unwrap_or_else(|| "n/a".to_string()),
            train_no: record.train_no.clone(),
        })
    }
}

/// A complete HTML document for one refresh cycle.
#[derive(Debug, Clone)]
pub struct MapDocument {
    html: String,
    marker_count: usize,
    failure: Option<String>,
    generated_at: DateTime<Utc>,
}

impl MapDocument {
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of train markers on the map (zero for notices).
    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    /// Why the cycle failed, for error documents.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Placeholder shown before the first cycle completes.
    pub fn pending(config: &MapConfig) -> Self {
        let generated_at = Utc::now();
        let html = render_notice(
            config,
            "Loading live train map",
            "Waiting for the first refresh.",
            generated_at,
        );
        Self {
            html,
            marker_count: 0,
            failure: None,
            generated_at,
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render the live map for `records`.
///
/// Records without both coordinates are left off the map.
pub fn render(records: &[JoinedRecord], config: &MapConfig) -> Result<MapDocument, RenderError> {
    let markers: Vec<MarkerView> = records
        .iter()
        .filter_map(|r| MarkerView::from_record(r, config.delay_threshold_minutes))
        .collect();

    let skipped = records.len() - markers.len();
    if skipped > 0 {
        debug!(skipped, "records without coordinates left off the map");
    }

    let generated_at = Utc::now();
    let html = MapTemplate {
        config,
        markers: &markers,
        generated_at: timestamp(generated_at),
    }
    .render()?;

    Ok(MapDocument {
        html,
        marker_count: markers.len(),
        failure: None,
        generated_at,
    })
}

/// Render the document shown when a cycle fails. Never fails itself.
pub fn render_error(reason: &str, config: &MapConfig) -> MapDocument {
    let generated_at = Utc::now();
    let message = format!("Unable to update map: {reason}");
    let html = render_notice(config, "Map unavailable", &message, generated_at);

    MapDocument {
        html,
        marker_count: 0,
        failure: Some(reason.to_string()),
        generated_at,
    }
}

fn render_notice(
    config: &MapConfig,
    heading: &str,
    message: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let template = NoticeTemplate {
        title: &config.title,
        heading,
        message,
        generated_at: timestamp(generated_at),
    };

    template.render().unwrap_or_else(|e| {
        error!(error = %e, "notice template failed to render");
        FALLBACK_HTML.to_string()
    })
}
