//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers to displayed miles.
pub const KM_TO_MILES: f64 = 0.621;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use clinicfinder_geo::{haversine_distance, Coordinate};
///
/// let detroit = Coordinate::new(42.33, -83.05);
/// let ann_arbor = Coordinate::new(42.28, -83.74);
///
/// let distance = haversine_distance(&detroit, &ann_arbor);
/// assert!(distance > 55.0 && distance < 60.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 at antipodal points
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in miles.
#[inline]
pub fn haversine_distance_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    km_to_miles(haversine_distance(from, to))
}

/// Convert kilometers to miles. Infinity stays infinite.
#[inline]
pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILES
}

/// Distance in both units. Infinite when there is no reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub km: f64,
    pub miles: f64,
}

impl Distance {
    /// Distance to nowhere: never excluded by a radius filter.
    pub const UNKNOWN: Distance = Distance { km: f64::INFINITY, miles: f64::INFINITY };

    pub fn from_km(km: f64) -> Self {
        Self { km, miles: km_to_miles(km) }
    }

    pub fn is_finite(&self) -> bool {
        self.km.is_finite()
    }
}

/// Distance from an optional reference point.
#[inline]
pub fn distance_from(reference: Option<&Coordinate>, to: &Coordinate) -> Distance {
    match reference {
        Some(origin) => Distance::from_km(haversine_distance(origin, to)),
        None => Distance::UNKNOWN,
    }
}
