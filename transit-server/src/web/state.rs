//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CachedFeedClient, EstimatesCache};
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached feed client
    pub feed: Arc<CachedFeedClient>,

    /// Process-wide estimates snapshot
    pub estimates: Arc<EstimatesCache>,

    /// Route planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state. The estimates cache uses the planner's TTL.
    pub fn new(feed: CachedFeedClient, config: PlannerConfig) -> Self {
        Self {
            feed: Arc::new(feed),
            estimates: Arc::new(EstimatesCache::new(config.estimates_ttl)),
            config: Arc::new(config),
        }
    }
}
