//! Map markers and their identity.

use crate::category::Category;
use clinicfinder_geo::Coordinate;
use serde::Serialize;
use std::fmt;

/// Stable marker identity across frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MarkerKey {
    /// The user's reference point
    Reference,
    /// A clinic, by record id
    Clinic(String),
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKey::Reference => f.write_str("reference"),
            MarkerKey::Clinic(id) => write!(f, "clinic:{id}"),
        }
    }
}

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Colored pin for a clinic category
    Clinic(Category),
    /// Distinct "you are here" icon
    Reference,
}

impl MarkerIcon {
    pub const REFERENCE_COLOR: &'static str = "#111827";

    pub fn color(self) -> &'static str {
        match self {
            MarkerIcon::Clinic(category) => category.color(),
            MarkerIcon::Reference => Self::REFERENCE_COLOR,
        }
    }
}

/// One marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: MarkerKey,
    pub position: Coordinate,
    pub icon: MarkerIcon,
    /// Hover text
    pub title: String,
    /// Rendered popup HTML; the reference marker has none
    pub popup_html: Option<String>,
}
