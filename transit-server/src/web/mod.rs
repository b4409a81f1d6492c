//! Web layer for the transit route planner.
//!
//! Provides HTTP endpoints for planning routes and looking up stops, lines
//! and live estimates.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
