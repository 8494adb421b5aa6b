//! Left join of the live board onto the station directory.

use std::collections::HashMap;

use crate::tdx::{LiveTrainRecord, StationRecord};

/// A live train with the flat details of the station it is at.
///
/// Station fields are `None` when the station is unknown to the directory or
/// its entry lacks the value.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub station_id: String,
    pub train_no: String,
    pub delay_minutes: Option<i64>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl JoinedRecord {
    /// `(latitude, longitude)` when both are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Flat station fields, extracted once per directory entry.
#[derive(Debug, Clone, Default, PartialEq)]
struct StationDetails {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Join `live` onto `stations` by station id.
///
/// Every live record yields exactly one output record, in input order. When
/// the directory lists a station id more than once the first entry wins.
pub fn join<S: AsRef<str>>(
    live: &[LiveTrainRecord],
    stations: &[StationRecord],
    locales: &[S],
) -> Vec<JoinedRecord> {
    let index = build_index(stations, locales);

    live.iter()
        .map(|train| {
            let details = index
                .get(train.station_id.as_str())
                .cloned()
                .unwrap_or_default();

            JoinedRecord {
                station_id: train.station_id.clone(),
                train_no: train.train_no.clone(),
                delay_minutes: train.delay_minutes,
                name: details.name,
                latitude: details.latitude,
                longitude: details.longitude,
            }
        })
        .collect()
}

/// Build the station id → details map.
fn build_index<'a, S: AsRef<str>>(
    stations: &'a [StationRecord],
    locales: &[S],
) -> HashMap<&'a str, StationDetails> {
    let mut index = HashMap::with_capacity(stations.len());
    for station in stations {
        index
            .entry(station.station_id.as_str())
            .or_insert_with(|| StationDetails {
                name: station.localized_name(locales),
                latitude: station.latitude(),
                longitude: station.longitude(),
            });
    }
    index
}
