//! Route planning between two stops.
//!
//! The feed has no routing of its own, so routes are derived from line stop
//! sequences. Direct routes are tried first; one-transfer routes are only
//! searched when no direct route is available.

use std::collections::BTreeSet;
use std::future::Future;

use chrono::Utc;
use futures::{TryFutureExt, try_join};
use tracing::debug;

use crate::cache::EstimatesCache;
use crate::domain::{Estimate, RouteCandidate, RoutePlan, SequenceEntry, distinct_lines};
use crate::feed::FeedError;

use super::active::ActiveLineSet;
use super::config::PlannerConfig;
use super::direct::match_direct;
use super::transfer::{TransferInputs, match_transfers};

/// Error from route planning.
///
/// Only transport failures are errors. A query with no possible route
/// succeeds with an empty plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        source: FeedError,
    },
}

impl PlanError {
    fn fetch(what: &'static str) -> impl FnOnce(FeedError) -> PlanError {
        move |source| PlanError::Fetch { what, source }
    }
}

/// Source of route geometry and live estimates.
///
/// This abstraction allows the planner to be tested with in-memory data.
pub trait TransitFeed {
    /// All sequence entries recorded at a stop.
    fn sequence_by_stop(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<Vec<SequenceEntry>, FeedError>> + Send;

    /// Full sequences for every given line.
    fn sequence_by_lines(
        &self,
        lines: &BTreeSet<String>,
    ) -> impl Future<Output = Result<Vec<SequenceEntry>, FeedError>> + Send;

    /// Live estimates at one stop.
    fn estimates_by_stop(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<Vec<Estimate>, FeedError>> + Send;

    /// The full live estimates collection.
    fn all_estimates(&self) -> impl Future<Output = Result<Vec<Estimate>, FeedError>> + Send;
}

/// Route planner over a feed and a shared estimates cache.
pub struct Planner<'a, F: TransitFeed> {
    feed: &'a F,
    estimates: &'a EstimatesCache,
    config: &'a PlannerConfig,
}

impl<'a, F: TransitFeed> Planner<'a, F> {
    pub fn new(feed: &'a F, estimates: &'a EstimatesCache, config: &'a PlannerConfig) -> Self {
        Self {
            feed,
            estimates,
            config,
        }
    }

    /// Plan routes from `origin` to `destination`.
    ///
    /// The two ids must differ; callers reject equal ids before getting here.
    /// Independent fetches run concurrently and the first failure aborts the
    /// whole call.
    pub async fn plan_route(&self, origin: &str, destination: &str) -> Result<RoutePlan, PlanError> {
        let (at_origin, at_destination) = try_join!(
            self.feed
                .sequence_by_stop(origin)
                .map_err(PlanError::fetch("origin stop sequence")),
            self.feed
                .sequence_by_stop(destination)
                .map_err(PlanError::fetch("destination stop sequence")),
        )?;

        let origin_lines = distinct_lines(&at_origin);
        let destination_lines = distinct_lines(&at_destination);

        let (origin_network, destination_network, origin_estimates, snapshot) = try_join!(
            self.feed
                .sequence_by_lines(&origin_lines)
                .map_err(PlanError::fetch("origin line sequences")),
            self.feed
                .sequence_by_lines(&destination_lines)
                .map_err(PlanError::fetch("destination line sequences")),
            self.feed
                .estimates_by_stop(origin)
                .map_err(PlanError::fetch("origin stop estimates")),
            self.estimates
                .get_with(|| self.feed.all_estimates())
                .map_err(PlanError::fetch("estimates snapshot")),
        )?;

        let active = ActiveLineSet::from_estimates(&snapshot);

        let direct = match_direct(&at_origin, &at_destination, &active, &origin_estimates);

        let transfers = if direct.is_empty() {
            let inputs = TransferInputs {
                origin_id: origin,
                destination_id: destination,
                at_origin: &at_origin,
                at_destination: &at_destination,
                origin_network: &origin_network,
                destination_network: &destination_network,
            };
            match_transfers(&inputs, &active, self.config.max_transfer_routes)
        } else {
            Vec::new()
        };

        debug!(
            origin,
            destination,
            origin_lines = origin_lines.len(),
            destination_lines = destination_lines.len(),
            active_lines = active.len(),
            direct = direct.len(),
            transfers = transfers.len(),
            "planned route"
        );

        let candidates = direct
            .into_iter()
            .map(RouteCandidate::Direct)
            .chain(transfers.into_iter().map(RouteCandidate::Transfer));

        Ok(RoutePlan::from_candidates(
            origin,
            destination,
            candidates,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
