//! TDX API response DTOs.
//!
//! These types map directly to the TDX Rail/TRA JSON responses. TDX omits
//! fields rather than sending nulls in many cases, so everything that is not
//! the join key is optional. Nested station objects are kept as raw JSON and
//! read through the extraction functions in [`crate::domain`].

use serde::Deserialize;
use serde_json::{Map, Value};

/// Response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,

    /// Token lifetime in seconds.
    pub expires_in: Option<i64>,
}

/// Response from the `TrainLiveBoard` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveBoardResponse {
    #[serde(rename = "TrainLiveBoards", default)]
    pub train_live_boards: Vec<LiveTrainRecord>,
}

/// Response from the `Station` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StationResponse {
    #[serde(rename = "Stations", default)]
    pub stations: Vec<StationRecord>,
}

/// One train on the live board: where it is and how late it runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveTrainRecord {
    /// Station the train is currently at or approaching.
    #[serde(rename = "StationID", default)]
    pub station_id: String,

    #[serde(rename = "TrainNo", default)]
    pub train_no: String,

    /// Delay in minutes.
    #[serde(rename = "DelayTime", default)]
    pub delay_minutes: Option<i64>,

    /// Every other field of the record, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LiveTrainRecord {
    pub fn new(
        station_id: impl Into<String>,
        train_no: impl Into<String>,
        delay_minutes: Option<i64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            train_no: train_no.into(),
            delay_minutes,
            extra: Map::new(),
        }
    }
}

/// One entry of the station directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    #[serde(rename = "StationID", default)]
    pub station_id: String,

    /// Locale-keyed name object, e.g. `{"Zh_tw": "臺北", "En": "Taipei"}`.
    #[serde(rename = "StationName", default)]
    pub name: Option<Value>,

    /// Position object, e.g. `{"PositionLat": 25.04, "PositionLon": 121.51}`.
    #[serde(rename = "StationPosition", default)]
    pub position: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationRecord {
    pub fn new(station_id: impl Into<String>, name: Option<Value>, position: Option<Value>) -> Self {
        Self {
            station_id: station_id.into(),
            name,
            position,
            extra: Map::new(),
        }
    }

    /// A station with a `Zh_tw` name and a full position.
    pub fn located(station_id: impl Into<String>, name: &str, lat: f64, lon: f64) -> Self {
        Self::new(
            station_id,
            Some(serde_json::json!({ "Zh_tw": name })),
            Some(serde_json::json!({ "PositionLat": lat, "PositionLon": lon })),
        )
    }
}
