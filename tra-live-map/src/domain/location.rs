//! Extraction of flat station fields from the nested TDX objects.
//!
//! `StationName` is an object keyed by locale and `StationPosition` carries
//! `PositionLat` / `PositionLon`. Either may be missing, null, or hold
//! something unexpected; every extractor here returns `None` in those cases
//! instead of failing.

use serde_json::Value;

use crate::tdx::StationRecord;

/// Locale used for station names unless configured otherwise.
pub const DEFAULT_NAME_LOCALE: &str = "Zh_tw";

const LATITUDE_KEY: &str = "PositionLat";
const LONGITUDE_KEY: &str = "PositionLon";

/// Pick the first non-empty name among `locales`, in preference order.
pub fn localized_name<S: AsRef<str>>(name: Option<&Value>, locales: &[S]) -> Option<String> {
    let names = name?.as_object()?;
    locales.iter().find_map(|locale| {
        names
            .get(locale.as_ref())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Read one numeric field of a position object.
///
/// Numeric strings are accepted since some TDX feeds quote coordinates.
/// Non-finite values are rejected.
pub fn coordinate(position: Option<&Value>, key: &str) -> Option<f64> {
    let value = position?.as_object()?.get(key)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Finite and within [-90, 90].
pub fn is_latitude(value: f64) -> bool {
    (-90.0..=90.0).contains(&value)
}

/// Finite and within [-180, 180].
pub fn is_longitude(value: f64) -> bool {
    (-180.0..=180.0).contains(&value)
}

/// Latitude in degrees, `None` when absent or outside [-90, 90].
pub fn latitude(position: Option<&Value>) -> Option<f64> {
    coordinate(position, LATITUDE_KEY).filter(|lat| is_latitude(*lat))
}

/// Longitude in degrees, `None` when absent or outside [-180, 180].
pub fn longitude(position: Option<&Value>) -> Option<f64> {
    coordinate(position, LONGITUDE_KEY).filter(|lon| is_longitude(*lon))
}

impl StationRecord {
    pub fn localized_name<S: AsRef<str>>(&self, locales: &[S]) -> Option<String> {
        localized_name(self.name.as_ref(), locales)
    }

    pub fn latitude(&self) -> Option<f64> {
        latitude(self.position.as_ref())
    }

    pub fn longitude(&self) -> Option<f64> {
        longitude(self.position.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_prefers_first_locale() {
        let name = json!({"Zh_tw": "臺北", "En": "Taipei"});
        assert_eq!(
            localized_name(Some(&name), &["Zh_tw", "En"]).as_deref(),
            Some("臺北")
        );
        assert_eq!(
            localized_name(Some(&name), &["En", "Zh_tw"]).as_deref(),
            Some("Taipei")
        );
    }

    #[test]
    fn name_falls_through_missing_locales() {
        let name = json!({"En": "Taipei", "Zh_tw": ""});
        assert_eq!(
            localized_name(Some(&name), &["Zh_tw", "En"]).as_deref(),
            Some("Taipei")
        );
        assert_eq!(localized_name(Some(&name), &["Ja"]), None);
    }

    #[test]
    fn malformed_name_is_none() {
        assert_eq!(localized_name(None, &["Zh_tw"]), None);
        assert_eq!(localized_name(Some(&Value::Null), &["Zh_tw"]), None);
        assert_eq!(localized_name(Some(&json!("Taipei")), &["Zh_tw"]), None);
        assert_eq!(localized_name(Some(&json!({"Zh_tw": 5})), &["Zh_tw"]), None);
    }

    #[test]
    fn coordinates_from_numbers_and_strings() {
        let position = json!({"PositionLat": 25.04776, "PositionLon": "121.51706"});
        assert_eq!(latitude(Some(&position)), Some(25.04776));
        assert_eq!(longitude(Some(&position)), Some(121.51706));
    }

    #[test]
    fn malformed_coordinates_are_none() {
        assert_eq!(latitude(None), None);
        assert_eq!(latitude(Some(&Value::Null)), None);
        assert_eq!(latitude(Some(&json!({"PositionLon": 121.5}))), None);
        assert_eq!(latitude(Some(&json!({"PositionLat": "north"}))), None);
        assert_eq!(latitude(Some(&json!({"PositionLat": true}))), None);
        assert_eq!(latitude(Some(&json!([25.0, 121.5]))), None);
        assert_eq!(latitude(Some(&json!({"PositionLat": "NaN"}))), None);
    }

    #[test]
    fn out_of_range_coordinates_are_none() {
        let position = json!({"PositionLat": 125.0, "PositionLon": 221.5});
        assert_eq!(latitude(Some(&position)), None);
        assert_eq!(longitude(Some(&position)), None);
    }

    #[test]
    fn station_record_accessors() {
        let station = StationRecord::located("1000", "臺北", 25.0, 121.5);
        assert_eq!(station.localized_name(&["Zh_tw"]).as_deref(), Some("臺北"));
        assert_eq!(station.latitude(), Some(25.0));
        assert_eq!(station.longitude(), Some(121.5));

        let bare = StationRecord::new("1000", None, None);
        assert_eq!(bare.localized_name(&["Zh_tw"]), None);
        assert_eq!(bare.latitude(), None);
        assert_eq!(bare.longitude(), None);
    }
}
