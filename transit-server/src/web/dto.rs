//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DirectRoute, Estimate, Line, RoutePlan, Stop, TransferRoute};

/// Request to plan a route between two stops.
///
/// Missing parameters deserialize as empty so that `validate` reports them.
#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    /// Origin stop id
    #[serde(default)]
    pub origin: String,

    /// Destination stop id
    #[serde(default)]
    pub destination: String,
}

impl PlanRouteRequest {
    /// Trimmed (origin, destination), or why they can't be planned.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        let origin = self.origin.trim();
        let destination = self.destination.trim();

        if origin.is_empty() || destination.is_empty() {
            return Err("origin and destination stop ids are required".to_string());
        }
        if origin == destination {
            return Err(format!(
                "origin and destination are the same stop ({origin})"
            ));
        }

        Ok((origin, destination))
    }
}

/// A planned route, as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRouteResponse {
    pub origin: String,
    pub destination: String,

    /// Human-readable summary; explains an empty result.
    pub summary: String,

    #[serde(rename = "rutasDirectas")]
    pub direct_routes: Vec<DirectRoute>,

    #[serde(rename = "rutasConTransbordo")]
    pub transfer_routes: Vec<TransferRoute>,

    pub queried_at: DateTime<Utc>,
}

impl From<RoutePlan> for PlanRouteResponse {
    fn from(plan: RoutePlan) -> Self {
        Self {
            summary: plan.summary(),
            origin: plan.origin,
            destination: plan.destination,
            direct_routes: plan.direct_routes,
            transfer_routes: plan.transfer_routes,
            queried_at: plan.queried_at,
        }
    }
}

/// Request to search stops by name.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Search query
    #[serde(default)]
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<Stop>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEstimatesResponse {
    pub stop_id: String,
    pub estimates: Vec<Estimate>,
}

/// Request to search lines. An empty query lists every line.
#[derive(Debug, Deserialize)]
pub struct LineSearchRequest {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LineSearchResponse {
    pub lines: Vec<Line>,
}

/// Health and cache diagnostics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,

    /// Stop and line-set sequences currently held in the geometry cache
    pub cached_sequences: u64,

    /// Seconds since the estimates snapshot was fetched, if ever
    pub estimates_age_secs: Option<u64>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
