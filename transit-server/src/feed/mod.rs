//! Client for the municipal transport open-data feed.
//!
//! The feed exposes flat, paginated collections: route sequences (which
//! stops each line calls at, and where along the route), live arrival
//! estimates, stops and lines. It has no routing capability of its own.

mod client;
mod convert;
mod error;
pub mod filter;
mod types;

pub use client::{FeedClient, FeedConfig};
pub use convert::{convert_estimate, convert_sequence, convert_sequence_record};
pub use error::FeedError;
pub use types::{
    Page, RawArrival, RawEstimate, RawGeometry, RawLine, RawSequenceRecord, RawStop,
};
