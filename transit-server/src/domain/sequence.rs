//! Stop sequence types.
//!
//! A line's route geometry is published as a flat set of (line, direction,
//! stop, position) records. Position is the distance along the route in
//! kilometers and increases monotonically within one (line, direction).

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Direction of travel along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Map the feed's numeric direction code.
    ///
    /// The feed encodes outbound as exactly `1`; any other value, fractional
    /// ones included, is inbound.
    pub fn from_feed_code(code: f64) -> Self {
        if code == 1.0 {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stop on one line in one direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceEntry {
    /// Line label, e.g. "15" or "N3".
    pub line: String,

    /// Direction of travel.
    pub direction: Direction,

    /// Distance along the route in kilometers.
    pub position_km: f64,

    /// Stop identifier.
    pub stop_id: String,

    /// Stop display name.
    pub stop_name: String,
}

impl SequenceEntry {
    /// Whether `other` is on the same line and direction as this entry.
    pub fn same_run(&self, other: &SequenceEntry) -> bool {
        self.line == other.line && self.direction == other.direction
    }

    /// Whether `other` can be reached by staying on board from this entry.
    pub fn reaches(&self, other: &SequenceEntry) -> bool {
        self.same_run(other) && self.position_km <= other.position_km
    }
}

/// Sort entries by (direction, position) in place.
///
/// Records arrive in no particular order; everything downstream relies on
/// this ordering.
pub fn sort_sequence(entries: &mut [SequenceEntry]) {
    entries.sort_by(|a, b| {
        a.direction
            .cmp(&b.direction)
            .then_with(|| a.position_km.total_cmp(&b.position_km))
    });
}

/// The distinct line labels mentioned in a list of entries.
pub fn distinct_lines(entries: &[SequenceEntry]) -> BTreeSet<String> {
    entries.iter().map(|e| e.line.clone()).collect()
}
