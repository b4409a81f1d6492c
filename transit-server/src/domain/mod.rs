//! Domain types for the transit route planner.
//!
//! These are the typed entities produced by parsing the open-data feed.
//! They are read-only snapshots for the duration of one planning call.

mod estimate;
mod route;
mod sequence;
mod stop;

pub use estimate::{Arrival, Estimate, EstimatesSnapshot};
pub use route::{DirectRoute, RouteCandidate, RoutePlan, TransferLeg, TransferRoute};
pub use sequence::{Direction, SequenceEntry, distinct_lines, sort_sequence};
pub use stop::{Line, Stop, StopRef};
