//! Geospatial utilities for clinic search.
//!
//! This crate provides:
//! - A validated [`Coordinate`] type and the service-region [`BoundingBox`]
//! - Normalization of the many shapes stored clinic coordinates arrive in
//! - Haversine distance in kilometers and miles
//! - Batch distance annotation against an optional reference point
//!
//! # Example
//!
//! ```
//! use clinicfinder_geo::{haversine_distance, normalize_coordinates, BoundingBox, Coordinate};
//! use serde_json::json;
//!
//! // Stored as (lng, lat); the region box fixes the order
//! let clinic = normalize_coordinates(&json!([-83.74, 42.28]), &BoundingBox::CONTINENTAL_US).unwrap();
//! let detroit = Coordinate::new(42.33, -83.05);
//!
//! let km = haversine_distance(&detroit, &clinic);
//! assert!((km - 57.0).abs() < 3.0);
//! ```

mod haversine;
mod normalize;
mod region;
pub mod batch;
mod error;

pub use haversine::{
    distance_from, haversine_distance, haversine_distance_miles, km_to_miles, Distance,
    EARTH_RADIUS_KM, KM_TO_MILES,
};
pub use normalize::{normalize_coordinates, parse_component};
pub use region::BoundingBox;
pub use batch::{annotate_distances, DistanceResult};
pub use error::{GeoError, Result};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({latitude}, {longitude})")))
        }
    }

    /// Returns true if both components are finite and in range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// The same point with the axes exchanged.
    #[inline]
    pub const fn swapped(&self) -> Self {
        Self::new(self.longitude, self.latitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}
