//! Batch distance annotation.
//!
//! Annotates a collection of located items with their distance from an
//! optional reference point. Items are borrowed, never copied or mutated.

use crate::{distance_from, Coordinate, Distance};

/// Anything with a normalized position.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

/// An item paired with its distance from the reference point.
#[derive(Debug, Clone, Copy)]
pub struct DistanceResult<'a, T> {
    pub item: &'a T,
    /// Infinite in both units when there was no reference point
    pub distance: Distance,
}

/// Annotate every item with its distance from `reference`.
///
/// # Example
/// ```
/// use clinicfinder_geo::{annotate_distances, Coordinate};
///
/// let clinics = [Coordinate::new(42.28, -83.74), Coordinate::new(42.33, -83.05)];
///
/// let near = annotate_distances(Some(&Coordinate::new(42.33, -83.05)), &clinics);
/// assert!(near[1].distance.km < 0.001);
///
/// let nowhere = annotate_distances(None, &clinics);
/// assert!(nowhere.iter().all(|r| r.distance.km.is_infinite()));
/// ```
pub fn annotate_distances<'a, T, I>(reference: Option<&Coordinate>, items: I) -> Vec<DistanceResult<'a, T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| DistanceResult {
            item,
            distance: distance_from(reference, &item.coordinate()),
        })
        .collect()
}

/// Keep results within `radius_miles`.
///
/// Unknown distances (no reference point) always pass. Any other distance
/// that is not within the radius, NaN included, is dropped.
pub fn retain_within_miles<T>(results: &mut Vec<DistanceResult<'_, T>>, radius_miles: f64) {
    results.retain(|r| r.distance.km == f64::INFINITY || r.distance.miles <= radius_miles);
}

/// Stable ascending sort by distance; infinite distances keep their order at the end.
pub fn sort_by_distance<T>(results: &mut [DistanceResult<'_, T>]) {
    results.sort_by(|a, b| a.distance.miles.total_cmp(&b.distance.miles));
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETROIT: Coordinate = Coordinate::new(42.33, -83.05);

    fn create_test_items() -> Vec<Coordinate> {
        vec![
            Coordinate::new(41.8781, -87.6298), // Chicago
            Coordinate::new(42.28, -83.74),     // Ann Arbor
            Coordinate::new(42.96, -85.67),     // Grand Rapids
            Coordinate::new(42.3314, -83.0458), // Downtown Detroit
        ]
    }

    #[test]
    fn test_annotate_with_reference() {
        let items = create_test_items();
        let results = annotate_distances(Some(&DETROIT), &items);

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.distance.is_finite()));
        assert!(results[3].distance.km < 1.0);
    }

    #[test]
    fn test_annotate_without_reference() {
        let items = create_test_items();
        let results = annotate_distances(None, &items);
        assert!(results.iter().all(|r| r.distance.miles.is_infinite()));
    }

    #[test]
    fn test_sorted_distances() {
        let items = create_test_items();
        let mut results = annotate_distances(Some(&DETROIT), &items);
        sort_by_distance(&mut results);

        for window in results.windows(2) {
            assert!(window[0].distance.miles <= window[1].distance.miles);
        }
        assert_eq!(*results[0].item, items[3]);
    }

    #[test]
    fn test_radius_filter() {
        let items = create_test_items();
        let mut results = annotate_distances(Some(&DETROIT), &items);
        retain_within_miles(&mut results, 50.0);

        // Detroit and Ann Arbor only
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.distance.miles <= 50.0));
    }

    #[test]
    fn test_radius_filter_inert_without_reference() {
        let items = create_test_items();
        let mut results = annotate_distances(None, &items);
        retain_within_miles(&mut results, 50.0);
        assert_eq!(results.len(), items.len());
    }

    #[test]
    fn test_radius_filter_drops_unmeasurable_distances() {
        let items = create_test_items();
        let mut results = annotate_distances(Some(&DETROIT), &items);
        results[0].distance = Distance::from_km(f64::NAN);
        retain_within_miles(&mut results, 50.0);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.distance.miles <= 50.0));
    }

    #[test]
    fn test_sort_is_stable_for_unknown_distances() {
        let items = create_test_items();
        let mut results = annotate_distances(None, &items);
        sort_by_distance(&mut results);
        let order: Vec<Coordinate> = results.iter().map(|r| *r.item).collect();
        assert_eq!(order, items);
    }
}
