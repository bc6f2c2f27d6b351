//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur when building search parameters.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// Radius is not a positive finite number of miles
    #[error("Invalid radius: {0} (expected a positive number of miles)")]
    InvalidRadius(f64),

    /// Reference point is not a valid coordinate
    #[error("Invalid reference point: {0}")]
    InvalidReference(String),
}
