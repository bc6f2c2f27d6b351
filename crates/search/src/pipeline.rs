//! The filter/sort pipeline.
//!
//! Steps run in a fixed order:
//! 1. service substring match (skipped for a blank service)
//! 2. verified-only
//! 3. distance annotation against the optional reference point
//! 4. radius cut, only when a reference point exists
//! 5. stable ascending sort by miles
//!
//! The input slice is never modified; results borrow from it.

use crate::error::{Result, SearchError};
use clinicfinder_geo::batch::{annotate_distances, retain_within_miles, sort_by_distance};
use clinicfinder_geo::{Coordinate, Distance};
use clinicfinder_records::ClinicRecord;
use serde::Serialize;

/// Radius used when nothing else is configured.
pub const DEFAULT_RADIUS_MILES: f64 = 25.0;

/// User-chosen search inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Service substring; blank means any service
    pub service: String,
    pub verified_only: bool,
    /// Where distances are measured from, if known
    pub reference: Option<Coordinate>,
    pub radius_miles: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            service: String::new(),
            verified_only: false,
            reference: None,
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn verified_only(mut self, verified_only: bool) -> Self {
        self.verified_only = verified_only;
        self
    }

    pub fn reference(mut self, reference: Option<Coordinate>) -> Self {
        self.reference = reference;
        self
    }

    pub fn radius_miles(mut self, radius_miles: f64) -> Self {
        self.radius_miles = radius_miles;
        self
    }

    /// Check the radius and reference point.
    pub fn validate(&self) -> Result<()> {
        if !self.radius_miles.is_finite() || self.radius_miles <= 0.0 {
            return Err(SearchError::InvalidRadius(self.radius_miles));
        }
        if let Some(reference) = &self.reference {
            if !reference.is_valid() {
                return Err(SearchError::InvalidReference(reference.to_string()));
            }
        }
        Ok(())
    }
}

/// A clinic with its distance from the reference point.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankedClinic<'a> {
    #[serde(flatten)]
    pub clinic: &'a ClinicRecord,
    /// Infinite (serialized as null) without a reference point
    pub distance: Distance,
}

/// Run the pipeline.
///
/// # Example
/// ```
/// use clinicfinder_geo::Coordinate;
/// use clinicfinder_search::{search, SearchParams};
///
/// let params = SearchParams::new()
///     .service("dental")
///     .reference(Some(Coordinate::new(42.33, -83.05)));
/// let results = search(&[], &params);
/// assert!(results.is_empty());
/// ```
pub fn search<'a>(clinics: &'a [ClinicRecord], params: &SearchParams) -> Vec<RankedClinic<'a>> {
    let needle = params.service.trim().to_lowercase();
    let candidates = clinics
        .iter()
        .filter(|c| needle.is_empty() || c.offers(&needle))
        .filter(|c| !params.verified_only || c.verified);

    let mut results = annotate_distances(params.reference.as_ref(), candidates);

    if params.reference.is_some() {
        retain_within_miles(&mut results, params.radius_miles);
    }

    sort_by_distance(&mut results);

    tracing::debug!(
        total = clinics.len(),
        matched = results.len(),
        service = %needle,
        has_reference = params.reference.is_some(),
        "search complete"
    );

    results
        .into_iter()
        .map(|r| RankedClinic {
            clinic: r.item,
            distance: r.distance,
        })
        .collect()
}

/// Distinct service tags, case-insensitively deduplicated and sorted.
///
/// The first spelling seen wins.
pub fn service_options(clinics: &[ClinicRecord]) -> Vec<String> {
    let mut seen = std::collections::BTreeMap::new();
    for service in clinics.iter().flat_map(|c| c.services.iter()) {
        seen.entry(service.to_lowercase()).or_insert_with(|| service.clone());
    }
    seen.into_values().collect()
}
