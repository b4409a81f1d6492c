//! Live arrival estimates.

use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;

/// One upcoming bus at a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    /// Seconds until the bus reaches the stop.
    pub seconds: u32,

    /// Distance of the bus from the stop, in meters.
    pub distance_m: f64,

    /// Destination shown on the bus.
    pub destination: String,

    /// Whole minutes until arrival.
    pub minutes: u32,

    /// Wall-clock arrival time.
    pub clock_time: NaiveTime,
}

/// Estimates for one line at one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub stop_id: String,
    pub line: String,

    /// Up to two upcoming arrivals, soonest first.
    pub arrivals: Vec<Arrival>,
}

impl Estimate {
    /// Case-insensitive line comparison.
    pub fn is_for_line(&self, line: &str) -> bool {
        self.line.eq_ignore_ascii_case(line)
    }
}

/// The full estimates collection at one point in time.
pub type EstimatesSnapshot = Arc<Vec<Estimate>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_match_ignores_case() {
        let estimate = Estimate {
            stop_id: "539".to_string(),
            line: "n3".to_string(),
            arrivals: Vec::new(),
        };
        assert!(estimate.is_for_line("N3"));
        assert!(estimate.is_for_line("n3"));
        assert!(!estimate.is_for_line("N30"));
    }
}
