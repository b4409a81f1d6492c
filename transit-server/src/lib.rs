//! Transit route planner server.
//!
//! Answers "how do I get from stop A to stop B" against a municipal bus
//! open-data feed that only publishes flat stop sequences and live arrival
//! estimates, with no routing of its own.

pub mod cache;
pub mod domain;
pub mod feed;
pub mod planner;
pub mod web;
