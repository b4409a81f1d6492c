//! Conversion from raw feed records to domain types.
//!
//! Conversion never fails. Missing or malformed numeric fields become `0`,
//! missing text becomes empty, and a negative arrival time means "no bus"
//! so that arrival is dropped.

use chrono::{Duration, NaiveDateTime};
use serde_json::Value;

use crate::domain::{Arrival, Direction, Estimate, Line, SequenceEntry, Stop, sort_sequence};

use super::types::{RawArrival, RawEstimate, RawLine, RawSequenceRecord, RawStop};

/// The feed never reports more than this many upcoming buses per line.
const MAX_ARRIVALS: usize = 2;

/// Interpret a loose scalar as a number.
///
/// Accepts JSON numbers and numeric strings (with either `.` or `,` as the
/// decimal separator). Non-finite values are rejected.
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn number_or_zero(value: Option<&Value>) -> f64 {
    number(value).unwrap_or(0.0)
}

/// Interpret a loose scalar as text. Numbers are rendered without a
/// trailing `.0` so that line `15` and line `"15"` compare equal.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(
            n.as_i64()
                .map(|i| i.to_string())
                .unwrap_or_else(|| n.to_string()),
        ),
        _ => None,
    }
}

fn text_or_empty(value: Option<&Value>) -> String {
    text(value).unwrap_or_default()
}

/// Convert a single sequence record.
pub fn convert_sequence_record(raw: &RawSequenceRecord) -> SequenceEntry {
    SequenceEntry {
        line: text_or_empty(raw.line.as_ref()),
        direction: Direction::from_feed_code(number_or_zero(raw.direction.as_ref())),
        position_km: number_or_zero(raw.distance.as_ref()),
        stop_id: text_or_empty(raw.stop_id.as_ref()),
        stop_name: text_or_empty(raw.stop_name.as_ref()),
    }
}

/// Convert a batch of sequence records, sorted by (direction, position).
pub fn convert_sequence(records: &[RawSequenceRecord]) -> Vec<SequenceEntry> {
    let mut entries: Vec<SequenceEntry> = records.iter().map(convert_sequence_record).collect();
    sort_sequence(&mut entries);
    entries
}

fn convert_arrival(raw: &RawArrival, now: NaiveDateTime) -> Option<Arrival> {
    let seconds = number_or_zero(raw.seconds.as_ref());
    if seconds < 0.0 {
        return None;
    }

    let seconds = seconds.round().min(f64::from(u32::MAX)) as u32;

    Some(Arrival {
        seconds,
        distance_m: number_or_zero(raw.distance.as_ref()),
        destination: text_or_empty(raw.destination.as_ref()),
        minutes: seconds / 60,
        clock_time: (now + Duration::seconds(i64::from(seconds))).time(),
    })
}

/// Convert one estimate record, deriving minutes and clock time from `now`.
pub fn convert_estimate(raw: &RawEstimate, now: NaiveDateTime) -> Estimate {
    Estimate {
        stop_id: text_or_empty(raw.stop_id.as_ref()),
        line: text_or_empty(raw.line.as_ref()),
        arrivals: raw
            .arrivals
            .iter()
            .take(MAX_ARRIVALS)
            .filter_map(|a| convert_arrival(a, now))
            .collect(),
    }
}

pub fn convert_stop(raw: &RawStop) -> Stop {
    let coordinates = raw.geometry.as_ref().and_then(|g| {
        let lon = number(g.coordinates.first())?;
        let lat = number(g.coordinates.get(1))?;
        Some((lat, lon))
    });

    Stop {
        id: text_or_empty(raw.id.as_ref()),
        name: text_or_empty(raw.name.as_ref()),
        address: text(raw.address.as_ref()),
        direction_label: text(raw.direction_label.as_ref()),
        coordinates,
    }
}

pub fn convert_line(raw: &RawLine) -> Line {
    Line {
        label: text_or_empty(raw.label.as_ref()),
        name: text_or_empty(raw.name.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    use crate::feed::types::RawGeometry;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn raw_sequence(value: serde_json::Value) -> RawSequenceRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn sequence_record_full() {
        let entry = convert_sequence_record(&raw_sequence(json!({
            "linea": "15",
            "sentido": 1,
            "distancia": 1.2,
            "parada": "539",
            "nombreParada": "Plaza España"
        })));

        assert_eq!(entry.line, "15");
        assert_eq!(entry.direction, Direction::Outbound);
        assert_eq!(entry.position_km, 1.2);
        assert_eq!(entry.stop_id, "539");
        assert_eq!(entry.stop_name, "Plaza España");
    }

    #[test]
    fn sequence_record_numeric_strings() {
        let entry = convert_sequence_record(&raw_sequence(json!({
            "linea": 15,
            "sentido": "2",
            "distancia": "4,7",
            "parada": 1234
        })));

        assert_eq!(entry.line, "15");
        assert_eq!(entry.direction, Direction::Inbound);
        assert_eq!(entry.position_km, 4.7);
        assert_eq!(entry.stop_id, "1234");
        assert_eq!(entry.stop_name, "");
    }

    #[test]
    fn fractional_direction_codes_are_inbound() {
        for code in [json!("1.9"), json!(1.5), json!("1,2")] {
            let entry = convert_sequence_record(&raw_sequence(json!({
                "linea": "15",
                "sentido": code,
                "parada": "539"
            })));
            assert_eq!(entry.direction, Direction::Inbound, "code {code}");
        }

        let entry = convert_sequence_record(&raw_sequence(json!({"sentido": "1.0"})));
        assert_eq!(entry.direction, Direction::Outbound);
    }

    #[test]
    fn sequence_record_malformed_defaults_to_zero() {
        let entry = convert_sequence_record(&raw_sequence(json!({
            "linea": "N3",
            "sentido": {"nested": true},
            "distancia": "far away",
            "parada": "77"
        })));

        // Direction code 0 is "anything else", i.e. inbound
        assert_eq!(entry.direction, Direction::Inbound);
        assert_eq!(entry.position_km, 0.0);
    }

    #[test]
    fn sequence_record_empty() {
        let entry = convert_sequence_record(&RawSequenceRecord::default());
        assert_eq!(entry.line, "");
        assert_eq!(entry.position_km, 0.0);
        assert_eq!(entry.direction, Direction::Inbound);
    }

    #[test]
    fn sequence_batch_is_sorted() {
        let records = vec![
            raw_sequence(json!({"linea": "15", "sentido": 2, "distancia": 0.3, "parada": "c"})),
            raw_sequence(json!({"linea": "15", "sentido": 1, "distancia": 2.0, "parada": "b"})),
            raw_sequence(json!({"linea": "15", "sentido": 1, "distancia": 0.5, "parada": "a"})),
        ];

        let stops: Vec<String> = convert_sequence(&records)
            .into_iter()
            .map(|e| e.stop_id)
            .collect();
        assert_eq!(stops, vec!["a", "b", "c"]);
    }

    #[test]
    fn estimate_drops_negative_times() {
        let raw: RawEstimate = serde_json::from_value(json!({
            "parada": "539",
            "linea": "15",
            "llegadas": [
                {"tiempoSegundos": 150, "distancia": 620, "destino": "Delicias"},
                {"tiempoSegundos": -1, "distancia": 0, "destino": ""}
            ]
        }))
        .unwrap();

        let estimate = convert_estimate(&raw, now());
        assert_eq!(estimate.arrivals.len(), 1);

        let first = &estimate.arrivals[0];
        assert_eq!(first.seconds, 150);
        assert_eq!(first.minutes, 2);
        assert_eq!(first.distance_m, 620.0);
        assert_eq!(first.destination, "Delicias");
        assert_eq!(first.clock_time, NaiveTime::from_hms_opt(10, 2, 30).unwrap());
    }

    #[test]
    fn estimate_keeps_at_most_two_arrivals() {
        let raw: RawEstimate = serde_json::from_value(json!({
            "parada": "539",
            "linea": "15",
            "llegadas": [
                {"tiempoSegundos": 60},
                {"tiempoSegundos": 600},
                {"tiempoSegundos": 1200}
            ]
        }))
        .unwrap();

        let estimate = convert_estimate(&raw, now());
        assert_eq!(estimate.arrivals.len(), 2);
        assert_eq!(estimate.arrivals[1].minutes, 10);
    }

    #[test]
    fn estimate_missing_time_is_zero_not_absent() {
        let raw: RawEstimate = serde_json::from_value(json!({
            "parada": "539",
            "linea": "15",
            "llegadas": [{"destino": "Centro"}]
        }))
        .unwrap();

        let estimate = convert_estimate(&raw, now());
        assert_eq!(estimate.arrivals.len(), 1);
        assert_eq!(estimate.arrivals[0].seconds, 0);
        assert_eq!(estimate.arrivals[0].clock_time, now().time());
    }

    #[test]
    fn stop_swaps_geojson_coordinates() {
        let raw = RawStop {
            id: Some(json!("539")),
            name: Some(json!("Plaza España")),
            address: None,
            direction_label: Some(json!("Delicias")),
            geometry: Some(RawGeometry {
                coordinates: vec![json!(-0.8811), json!(41.6497)],
            }),
        };

        let stop = convert_stop(&raw);
        assert_eq!(stop.coordinates, Some((41.6497, -0.8811)));
        assert_eq!(stop.direction_label.as_deref(), Some("Delicias"));
        assert!(stop.address.is_none());
    }

    #[test]
    fn line_from_numeric_label() {
        let raw = RawLine {
            label: Some(json!(21)),
            name: Some(json!("Oliver - Vadorrey")),
        };
        let line = convert_line(&raw);
        assert_eq!(line.label, "21");
        assert_eq!(line.name, "Oliver - Vadorrey");
    }
}
