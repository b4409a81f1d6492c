//! Stops and lines as published by the open-data feed.

use serde::Serialize;

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub address: Option<String>,

    /// Free-text direction label, e.g. "towards Delicias".
    pub direction_label: Option<String>,

    /// (latitude, longitude) in WGS84.
    pub coordinates: Option<(f64, f64)>,
}

/// A bus line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Short label, e.g. "15" or "N3".
    pub label: String,
    pub name: String,
}

/// A stop as referenced from a route: identifier plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopRef {
    pub id: String,
    pub name: String,
}

impl StopRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
