//! Geocoder client errors

use std::time::Duration;
use thiserror::Error;

/// Result type alias for geocoder calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a geocoder call produced no answer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The geocoder answered with something that is not the expected JSON
    #[error("unreadable geocoder response: {0}")]
    Json(#[from] serde_json::Error),

    /// Client settings cannot produce a working client
    #[error("invalid geocoder settings: {0}")]
    Config(String),

    /// Non-success HTTP status
    #[error("geocoder returned HTTP {status}: {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, trimmed
        message: String,
    },

    /// Too many recent failures; calls are short-circuited until the breaker half-opens
    #[error("geocoder is unavailable after repeated failures")]
    CircuitOpen,

    /// No request slot opens up within the request timeout
    #[error("geocoder rate limit would delay the request by {0:?}")]
    RateLimited(Duration),

    /// No answer within the request timeout
    #[error("geocoder did not answer within {0:?}")]
    Timeout(Duration),

    /// Every attempt failed with a transient error
    #[error("geocoder failed {attempts} times, last error: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the final failure
        last_error: String,
    },
}

impl ApiError {
    /// Settings error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Non-success status with its body
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::ApiResponse {
            status,
            message: message.trim().chars().take(200).collect(),
        }
    }

    /// Whether another attempt could succeed
    ///
    /// Server errors, throttling (429) and timeouts are transient; a bad
    /// query or a malformed answer will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::CircuitOpen
            | Self::RateLimited(_)
            | Self::Config(_)
            | Self::Json(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }
}

impl From<ApiError> for clinicfinder_core::Error {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::Config(_) => clinicfinder_core::ErrorCode::ConfigValidationError,
            ApiError::Timeout(_) => clinicfinder_core::ErrorCode::Timeout,
            _ => clinicfinder_core::ErrorCode::GeocodingFailed,
        };
        clinicfinder_core::Error::new(code, err.to_string()).with_source(err)
    }
}
