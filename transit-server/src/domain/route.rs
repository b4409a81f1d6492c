//! Route candidates and the plan returned to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Direction, Estimate, StopRef};

/// A single-line itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRoute {
    pub line: String,
    pub direction: Direction,
    pub origin: StopRef,
    pub destination: StopRef,

    /// Distance travelled on board, rounded to 2 decimals. Never negative.
    pub distance_km: f64,

    /// Live estimate for this line at the origin stop, if one exists.
    pub next_bus: Option<Estimate>,
}

/// One leg of a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLeg {
    pub line: String,
    pub direction: Direction,
    pub from: StopRef,
    pub to: StopRef,
}

/// A two-line itinerary via one intermediate stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRoute {
    /// Origin to the transfer stop.
    pub first_leg: TransferLeg,

    /// Transfer stop to the destination.
    pub second_leg: TransferLeg,
}

impl TransferRoute {
    /// The stop where the passenger changes lines.
    pub fn transfer_stop(&self) -> &StopRef {
        &self.first_leg.to
    }
}

/// Either kind of itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteCandidate {
    Direct(DirectRoute),
    Transfer(TransferRoute),
}

/// The answer to one planning query.
///
/// An empty plan is a valid result: it means no currently operating line
/// connects the two stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub origin: String,
    pub destination: String,
    pub direct_routes: Vec<DirectRoute>,
    pub transfer_routes: Vec<TransferRoute>,
    pub queried_at: DateTime<Utc>,
}

impl RoutePlan {
    /// Assemble a plan, keeping candidates of each kind in discovery order.
    pub fn from_candidates(
        origin: impl Into<String>,
        destination: impl Into<String>,
        candidates: impl IntoIterator<Item = RouteCandidate>,
        queried_at: DateTime<Utc>,
    ) -> Self {
        let mut direct_routes = Vec::new();
        let mut transfer_routes = Vec::new();

        for candidate in candidates {
            match candidate {
                RouteCandidate::Direct(route) => direct_routes.push(route),
                RouteCandidate::Transfer(route) => transfer_routes.push(route),
            }
        }

        Self {
            origin: origin.into(),
            destination: destination.into(),
            direct_routes,
            transfer_routes,
            queried_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.direct_routes.is_empty() && self.transfer_routes.is_empty()
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return format!(
                "No route found from stop {} to stop {} on any line currently in service.",
                self.origin, self.destination
            );
        }

        format!(
            "Found {} direct route{} and {} route{} with one transfer from stop {} to stop {}.",
            self.direct_routes.len(),
            plural(self.direct_routes.len()),
            self.transfer_routes.len(),
            plural(self.transfer_routes.len()),
            self.origin,
            self.destination
        )
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
