//! Raw feed records.
//!
//! These map directly onto the feed's JSON. Upstream data quality is not
//! under our control, so every scalar is kept as a loose `Value` and only
//! interpreted during conversion: a record with a malformed field still
//! deserializes.

use serde::Deserialize;
use serde_json::Value;

/// Paginated envelope wrapping every collection resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Total records matching the query, across all pages.
    pub total_count: Option<u64>,

    /// Offset of the first record in this page.
    pub start: Option<u64>,

    /// Page size the server applied.
    pub rows: Option<u64>,

    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// One (line, direction, stop) record of a route's geometry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSequenceRecord {
    #[serde(rename = "linea")]
    pub line: Option<Value>,

    /// `1` for outbound, anything else inbound.
    #[serde(rename = "sentido")]
    pub direction: Option<Value>,

    /// Distance along the route in kilometers.
    #[serde(rename = "distancia")]
    pub distance: Option<Value>,

    #[serde(rename = "parada")]
    pub stop_id: Option<Value>,

    #[serde(rename = "nombreParada")]
    pub stop_name: Option<Value>,
}

/// Live estimates for one line at one stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEstimate {
    #[serde(rename = "parada")]
    pub stop_id: Option<Value>,

    #[serde(rename = "linea")]
    pub line: Option<Value>,

    #[serde(rename = "llegadas", default = "Vec::new")]
    pub arrivals: Vec<RawArrival>,
}

/// One upcoming bus.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArrival {
    /// Seconds until arrival. Negative means no bus.
    #[serde(rename = "tiempoSegundos")]
    pub seconds: Option<Value>,

    /// Meters between the bus and the stop.
    #[serde(rename = "distancia")]
    pub distance: Option<Value>,

    #[serde(rename = "destino")]
    pub destination: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStop {
    pub id: Option<Value>,

    #[serde(rename = "title")]
    pub name: Option<Value>,

    #[serde(rename = "direccion")]
    pub address: Option<Value>,

    #[serde(rename = "sentido")]
    pub direction_label: Option<Value>,

    pub geometry: Option<RawGeometry>,
}

/// GeoJSON point geometry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    /// `[longitude, latitude]`.
    #[serde(default = "Vec::new")]
    pub coordinates: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLine {
    #[serde(rename = "linea")]
    pub label: Option<Value>,

    #[serde(rename = "title")]
    pub name: Option<Value>,
}
