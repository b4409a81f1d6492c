//! Route planner.
//!
//! Answers "how do I get from stop A to stop B" using only the feed's flat
//! stop sequences, restricted to lines that currently have buses running.
//! Direct routes are preferred; a single transfer is searched only when no
//! direct route exists.

mod active;
mod config;
mod direct;
mod plan;
mod transfer;

pub use active::ActiveLineSet;
pub use config::PlannerConfig;
pub use direct::match_direct;
pub use plan::{PlanError, Planner, TransitFeed};
pub use transfer::{TransferInputs, match_transfers};
