//! Forward geocoding against a Nominatim-compatible `/search` endpoint

use crate::client::GeoClient;
use crate::error::ApiResult;
use clinicfinder_geo::{parse_component, Coordinate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Upper bound the public service accepts for `limit`
const MAX_LIMIT: u32 = 40;

/// Forward geocoding API interface
#[derive(Clone)]
pub struct GeocodeApi {
    client: GeoClient,
}

impl GeocodeApi {
    /// Create a new geocoding API interface
    pub(crate) fn new(client: GeoClient) -> Self {
        Self { client }
    }

    /// Search for places matching `query`
    ///
    /// Results whose coordinates do not parse are skipped.
    pub async fn search(&self, query: &str, limit: u32) -> ApiResult<Vec<Suggestion>> {
        let limit = limit.clamp(1, MAX_LIMIT);
        let mut params = vec![
            ("format", "json".to_string()),
            ("q", query.to_string()),
            ("limit", limit.to_string()),
        ];
        let country_codes = self.client.config().country_codes.trim();
        if !country_codes.is_empty() {
            params.push(("countrycodes", country_codes.to_string()));
        }

        let places: Vec<Place> = self.client.get("search", &params).await?;
        let suggestions: Vec<Suggestion> = places.into_iter().filter_map(Place::into_suggestion).collect();
        debug!(query, count = suggestions.len(), "geocode search complete");
        Ok(suggestions)
    }
}

/// A candidate location for a free-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable place name
    pub label: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Suggestion {
    /// The suggestion as a reference point
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Nominatim search result; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct Place {
    display_name: String,
    lat: Value,
    lon: Value,
}

impl Place {
    fn into_suggestion(self) -> Option<Suggestion> {
        let lat = parse_component(&self.lat)?;
        let lon = parse_component(&self.lon)?;
        let coord = Coordinate::try_new(lat, lon).ok()?;
        Some(Suggestion {
            label: self.display_name,
            lat: coord.latitude,
            lon: coord.longitude,
        })
    }
}
