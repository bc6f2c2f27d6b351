//! Coordinate normalization.
//!
//! Stored clinic coordinates come in several shapes:
//! - an ordered pair: `[42.28, -83.74]`, `["42.28", "-83.74"]`
//! - an object: `{"lat": 42.28, "lng": -83.74}`, `{"latitude": .., "longitude": ..}`,
//!   a serialized geo point `{"_latitude": .., "_longitude": ..}`, or `{"0": .., "1": ..}`
//! - a string holding either of the above as JSON, or `"42.28,-83.74"`
//!
//! Historical records mix `(lat, lng)` and `(lng, lat)` order, so the pair is
//! tested in both orders against the service region.

use crate::{BoundingBox, Coordinate};
use serde_json::Value;

const LAT_KEYS: [&str; 4] = ["lat", "latitude", "_latitude", "0"];
const LNG_KEYS: [&str; 5] = ["lng", "lon", "longitude", "_longitude", "1"];

/// Normalize a stored coordinate value into a `(lat, lng)` pair.
///
/// Returns `None` when the value has no recognizable pair, when either
/// component is not a finite number, or when neither axis order lies inside
/// `region`. The as-stored order wins whenever it is inside the region.
///
/// # Example
/// ```
/// use clinicfinder_geo::{normalize_coordinates, BoundingBox, Coordinate};
/// use serde_json::json;
///
/// let region = BoundingBox::CONTINENTAL_US;
/// assert_eq!(
///     normalize_coordinates(&json!([-83.05, 42.33]), &region),
///     Some(Coordinate::new(42.33, -83.05))
/// );
/// assert_eq!(normalize_coordinates(&json!({"lat": 51.5, "lng": -0.12}), &region), None);
/// ```
pub fn normalize_coordinates(value: &Value, region: &BoundingBox) -> Option<Coordinate> {
    let (first, second) = extract_pair(value)?;
    orient(first, second, region)
}

/// Pick the axis order that falls inside the region.
fn orient(first: f64, second: f64, region: &BoundingBox) -> Option<Coordinate> {
    let as_stored = Coordinate::new(first, second);
    if region.contains(&as_stored) {
        return Some(as_stored);
    }

    let swapped = as_stored.swapped();
    if region.contains(&swapped) {
        return Some(swapped);
    }

    None
}

/// Pull two finite numbers out of any supported shape, in stored order.
fn extract_pair(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            Some((parse_component(&items[0])?, parse_component(&items[1])?))
        }
        Value::Object(map) => {
            let lat = LAT_KEYS.iter().find_map(|k| map.get(*k))?;
            let lng = LNG_KEYS.iter().find_map(|k| map.get(*k))?;
            Some((parse_component(lat)?, parse_component(lng)?))
        }
        Value::String(text) => extract_pair_from_str(text),
        _ => None,
    }
}

fn extract_pair_from_str(text: &str) -> Option<(f64, f64)> {
    let text = text.trim();
    if text.starts_with('[') || text.starts_with('{') {
        let parsed: Value = serde_json::from_str(text).ok()?;
        // A string inside a string is not a supported shape
        return match parsed {
            Value::String(_) => None,
            other => extract_pair(&other),
        };
    }

    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [a, b] => Some((parse_finite(a)?, parse_finite(b)?)),
        _ => None,
    }
}

/// Parse a number or numeric string into a finite `f64`.
pub fn parse_component(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
