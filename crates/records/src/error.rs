//! Error types for record handling and document stores

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a stored document could not become a [`crate::ClinicRecord`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// No coordinate field survived normalization
    #[error("clinic {id} has no usable coordinates")]
    MissingCoordinates {
        /// Document id
        id: String,
    },
}

/// Document store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the backing file failed
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data is not valid JSON
    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing data is JSON of the wrong shape
    #[error("unexpected store layout: {0}")]
    Layout(String),

    /// The change feed could not be established or broke
    #[error("subscription failed: {0}")]
    Subscription(String),

    /// A looked-up record exists but is unusable
    #[error(transparent)]
    Malformed(#[from] RecordError),

    /// File watching could not be set up
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}
