//! Configuration for the route planner.

use std::time::Duration;

use crate::cache::DEFAULT_ESTIMATES_TTL;

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// How long a fetched estimates snapshot stays valid.
    pub estimates_ttl: Duration,

    /// Maximum number of transfer routes to return.
    pub max_transfer_routes: usize,
}

impl PlannerConfig {
    pub fn new(estimates_ttl: Duration, max_transfer_routes: usize) -> Self {
        Self {
            estimates_ttl,
            max_transfer_routes,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            estimates_ttl: DEFAULT_ESTIMATES_TTL,
            max_transfer_routes: 5,
        }
    }
}
