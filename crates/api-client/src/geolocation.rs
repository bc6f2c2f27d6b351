//! Device geolocation contract
//!
//! A location provider may be slow, denied, or absent. Callers go through
//! [`locate_or_none`], which turns every failure into "no reference point"
//! so search simply runs without distances.

use clinicfinder_geo::Coordinate;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Why a position could not be obtained
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The user declined to share a location
    #[error("location permission denied")]
    PermissionDenied,

    /// No fix is available
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the device's current position
pub trait LocationProvider: Send + Sync {
    /// Current position
    fn locate(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Ask `provider` for a position, giving up after `timeout`
///
/// Denial, unavailability, an invalid fix, and timeouts all yield `None`.
pub async fn locate_or_none<P: LocationProvider>(provider: &P, timeout: Duration) -> Option<Coordinate> {
    match tokio::time::timeout(timeout, provider.locate()).await {
        Ok(Ok(coord)) if coord.is_valid() => {
            debug!(%coord, "device location acquired");
            Some(coord)
        }
        Ok(Ok(coord)) => {
            info!(%coord, "ignoring invalid device location");
            None
        }
        Ok(Err(e)) => {
            info!(error = %e, "device location unavailable");
            None
        }
        Err(_) => {
            info!(timeout_ms = timeout.as_millis(), "device location timed out");
            None
        }
    }
}

/// A provider with a preset answer, for hosts without a location service and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Option<Coordinate>);

impl FixedLocation {
    /// Always answers with `coord`
    #[must_use]
    pub fn at(coord: Coordinate) -> Self {
        Self(Some(coord))
    }

    /// Always reports no fix
    #[must_use]
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Coordinate, LocationError> {
        self.0
            .ok_or_else(|| LocationError::Unavailable("no fixed location configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    impl LocationProvider for Denied {
        async fn locate(&self) -> Result<Coordinate, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    struct Hanging;

    impl LocationProvider for Hanging {
        async fn locate(&self) -> Result<Coordinate, LocationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Coordinate::new(42.33, -83.05))
        }
    }

    #[test]
    fn test_fixed_location() {
        let here = Coordinate::new(42.33, -83.05);
        let found = tokio_test::block_on(locate_or_none(&FixedLocation::at(here), Duration::from_secs(1)));
        assert_eq!(found, Some(here));
        let missing = tokio_test::block_on(locate_or_none(&FixedLocation::unavailable(), Duration::from_secs(1)));
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_denied_is_none() {
        assert_eq!(locate_or_none(&Denied, Duration::from_secs(1)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_none() {
        assert_eq!(locate_or_none(&Hanging, Duration::from_secs(5)).await, None);
    }

    #[tokio::test]
    async fn test_invalid_fix_is_none() {
        let bogus = FixedLocation::at(Coordinate::new(f64::NAN, 0.0));
        assert_eq!(locate_or_none(&bogus, Duration::from_secs(1)).await, None);
    }
}
