//! Clinic search for the clinic finder.
//!
//! This crate provides:
//! - The filter/sort pipeline: service match, verified-only, radius, distance order
//! - Search parameters with validation
//! - The list of distinct services for filter pickers

mod error;
mod pipeline;

pub use error::{Result, SearchError};
pub use pipeline::{search, service_options, RankedClinic, SearchParams, DEFAULT_RADIUS_MILES};
