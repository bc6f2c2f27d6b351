//! The canonical clinic record and its construction from stored documents.

use crate::document::RawDocument;
use crate::error::RecordError;
use crate::hours::Hours;
use crate::tags::normalize_tags;
use clinicfinder_core::Locale;
use clinicfinder_geo::batch::Located;
use clinicfinder_geo::{normalize_coordinates, BoundingBox, Coordinate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that may hold a coordinate value, in lookup order.
const COORDINATE_FIELDS: [&str; 4] = ["coords", "coordinates", "location", "geo"];
const TOP_LEVEL_LAT: [&str; 2] = ["lat", "latitude"];
const TOP_LEVEL_LNG: [&str; 3] = ["lng", "lon", "longitude"];

/// A clinic as the rest of the system sees it.
///
/// Only records with coordinates inside the service region exist in this
/// form; everything else is dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinate,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Hours>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, rename = "summary_es", skip_serializing_if = "Option::is_none")]
    pub summary_es: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ClinicRecord {
    /// Normalize a stored document.
    ///
    /// Fails only when no coordinate field normalizes inside `region`.
    /// Missing names and addresses become empty strings; malformed tag
    /// fields become empty lists.
    pub fn from_document(doc: &RawDocument, region: &BoundingBox) -> Result<Self, RecordError> {
        let fields = &doc.fields;
        let coordinates = locate(fields, region).ok_or_else(|| RecordError::MissingCoordinates {
            id: doc.id.clone(),
        })?;

        let tags = |key: &str| fields.get(key).map(normalize_tags).unwrap_or_default();

        Ok(Self {
            id: doc.id.clone(),
            slug: text(fields, "slug"),
            legacy_id: text(fields, "legacyId"),
            name: text(fields, "name").unwrap_or_default(),
            address: text(fields, "address").unwrap_or_default(),
            coordinates,
            services: tags("services"),
            languages: tags("languages"),
            eligibility: tags("eligibility"),
            hours: fields.get("hours").and_then(Hours::from_value),
            verified: fields.get("verified").is_some_and(truthy),
            summary: text(fields, "summary"),
            summary_es: text(fields, "summary_es"),
            url: text(fields, "url"),
            phone: text(fields, "phone"),
            photo_url: text(fields, "photoUrl"),
        })
    }

    /// Summary in the requested language, falling back to English.
    pub fn summary_for(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::Es => self.summary_es.as_deref().or(self.summary.as_deref()),
            Locale::En => self.summary.as_deref(),
        }
    }

    /// Case-insensitive substring match against any service tag.
    pub fn offers(&self, needle_lowercase: &str) -> bool {
        self.services
            .iter()
            .any(|s| s.to_lowercase().contains(needle_lowercase))
    }
}

impl Located for ClinicRecord {
    fn coordinate(&self) -> Coordinate {
        self.coordinates
    }
}

/// Normalize every document in a snapshot, keeping stored order.
///
/// Returns the usable records and how many documents were dropped.
pub fn normalize_snapshot(docs: &[RawDocument], region: &BoundingBox) -> (Vec<ClinicRecord>, usize) {
    let mut dropped = 0;
    let clinics = docs
        .iter()
        .filter_map(|doc| match ClinicRecord::from_document(doc, region) {
            Ok(clinic) => Some(clinic),
            Err(e) => {
                dropped += 1;
                tracing::debug!(id = %doc.id, error = %e, "dropping clinic record");
                None
            }
        })
        .collect();
    (clinics, dropped)
}

fn locate(fields: &Map<String, Value>, region: &BoundingBox) -> Option<Coordinate> {
    COORDINATE_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| normalize_coordinates(value, region))
        .or_else(|| {
            let lat = TOP_LEVEL_LAT.iter().find_map(|k| fields.get(*k))?;
            let lng = TOP_LEVEL_LNG.iter().find_map(|k| fields.get(*k))?;
            normalize_coordinates(&Value::Array(vec![lat.clone(), lng.clone()]), region)
        })
}

/// A trimmed, non-empty string field. Numbers are accepted as text.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}
