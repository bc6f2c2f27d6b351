//! Frame rendering with marker diffing.

use crate::category::classify;
use crate::error::Result;
use crate::marker::{Marker, MarkerIcon, MarkerKey};
use crate::popup::{Popup, PopupRenderer};
use crate::viewport::{Bounds, FitRequest};
use clinicfinder_geo::Coordinate;
use clinicfinder_search::RankedClinic;
use clinicfinder_telemetry::{metrics, names};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Default viewport margin in pixels.
pub const DEFAULT_PADDING_PX: u32 = 40;

/// Marker changes since the previous frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerDiff {
    pub added: Vec<MarkerKey>,
    pub updated: Vec<MarkerKey>,
    pub removed: Vec<MarkerKey>,
}

impl MarkerDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Everything a map needs to draw one state.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    /// Clinic markers in result order, then the reference marker
    pub markers: Vec<Marker>,
    pub diff: MarkerDiff,
    /// `None` when there is nothing to show
    pub fit: Option<FitRequest>,
}

impl RenderFrame {
    /// Markers as a GeoJSON `FeatureCollection` of points.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|marker| {
                let (kind, category) = match marker.icon {
                    MarkerIcon::Clinic(category) => ("clinic", Some(category)),
                    MarkerIcon::Reference => ("reference", None),
                };
                json!({
                    "type": "Feature",
                    "id": marker.key.to_string(),
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.position.longitude, marker.position.latitude],
                    },
                    "properties": {
                        "kind": kind,
                        "category": category,
                        "color": marker.icon.color(),
                        "title": marker.title,
                        "popup": marker.popup_html,
                    },
                })
            })
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some(fit) = &self.fit {
            let b = fit.bounds;
            collection["bbox"] = json!([b.west, b.south, b.east, b.north]);
        }
        collection
    }
}

/// Turns search results into frames, remembering the previous frame.
pub struct MapRenderer {
    padding_px: u32,
    popups: PopupRenderer,
    previous: HashMap<MarkerKey, Marker>,
    has_fit: bool,
}

impl MapRenderer {
    pub fn new(padding_px: u32) -> Result<Self> {
        Ok(Self {
            padding_px,
            popups: PopupRenderer::new()?,
            previous: HashMap::new(),
            has_fit: false,
        })
    }

    /// Recompute the full marker set for `clinics` and `reference`.
    ///
    /// Clinic markers are keyed by record id; a duplicate id keeps its first
    /// occurrence.
    pub fn render(&mut self, clinics: &[RankedClinic<'_>], reference: Option<Coordinate>) -> Result<RenderFrame> {
        let mut markers = Vec::with_capacity(clinics.len() + 1);
        let mut current: HashMap<MarkerKey, Marker> = HashMap::with_capacity(clinics.len() + 1);

        for ranked in clinics {
            let clinic = ranked.clinic;
            let key = MarkerKey::Clinic(clinic.id.clone());
            if current.contains_key(&key) {
                tracing::debug!(id = %clinic.id, "duplicate clinic id, skipping marker");
                continue;
            }
            let popup = self.popups.render(&Popup::from_ranked(ranked))?;
            let marker = Marker {
                key: key.clone(),
                position: clinic.coordinates,
                icon: MarkerIcon::Clinic(classify(&clinic.name, &clinic.services)),
                title: clinic.name.clone(),
                popup_html: Some(popup),
            };
            current.insert(key, marker.clone());
            markers.push(marker);
        }

        if let Some(position) = reference {
            let marker = Marker {
                key: MarkerKey::Reference,
                position,
                icon: MarkerIcon::Reference,
                title: "Your location".to_string(),
                popup_html: None,
            };
            current.insert(MarkerKey::Reference, marker.clone());
            markers.push(marker);
        }

        let diff = diff_markers(&self.previous, &current, &markers);
        let fit = Bounds::covering(markers.iter().map(|m| &m.position)).map(|bounds| {
            let request = FitRequest {
                bounds,
                padding_px: self.padding_px,
                animate: self.has_fit,
            };
            self.has_fit = true;
            request
        });

        metrics().gauge(names::MAP_MARKERS, markers.len() as u64);
        tracing::debug!(
            markers = markers.len(),
            added = diff.added.len(),
            updated = diff.updated.len(),
            removed = diff.removed.len(),
            "map frame rendered"
        );

        self.previous = current;
        Ok(RenderFrame { markers, diff, fit })
    }

    /// Forget the previous frame; the next fit is not animated.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.has_fit = false;
    }
}

fn diff_markers(previous: &HashMap<MarkerKey, Marker>, current: &HashMap<MarkerKey, Marker>, order: &[Marker]) -> MarkerDiff {
    let mut diff = MarkerDiff::default();
    for marker in order {
        match previous.get(&marker.key) {
            None => diff.added.push(marker.key.clone()),
            Some(old) if old != marker => diff.updated.push(marker.key.clone()),
            Some(_) => {}
        }
    }
    diff.removed = previous.keys().filter(|k| !current.contains_key(*k)).cloned().collect();
    diff.removed.sort();
    diff
}
