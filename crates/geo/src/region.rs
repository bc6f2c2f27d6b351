//! Service-region bounding box.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// Rectangular latitude/longitude range with exclusive bounds.
///
/// Used to decide which axis order a stored coordinate pair was written in.
/// A clinic genuinely located outside the box can never normalize: this is a
/// regional constraint of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Contiguous continental United States.
    pub const CONTINENTAL_US: BoundingBox = BoundingBox {
        min_lat: 24.0,
        max_lat: 50.0,
        min_lng: -125.0,
        max_lng: -66.0,
    };

    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self { min_lat, max_lat, min_lng, max_lng }
    }

    /// Strict containment test.
    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.latitude > self.min_lat
            && coord.latitude < self.max_lat
            && coord.longitude > self.min_lng
            && coord.longitude < self.max_lng
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::CONTINENTAL_US
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_interior_point() {
        assert!(BoundingBox::CONTINENTAL_US.contains(&Coordinate::new(42.33, -83.05)));
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let bbox = BoundingBox::CONTINENTAL_US;
        assert!(!bbox.contains(&Coordinate::new(24.0, -80.0)));
        assert!(!bbox.contains(&Coordinate::new(40.0, -66.0)));
        assert!(bbox.contains(&Coordinate::new(24.0001, -66.0001)));
    }

    #[test]
    fn test_outside_region() {
        // Honolulu and Anchorage fall outside the continental box
        assert!(!BoundingBox::CONTINENTAL_US.contains(&Coordinate::new(21.31, -157.86)));
        assert!(!BoundingBox::CONTINENTAL_US.contains(&Coordinate::new(61.22, -149.90)));
    }
}
