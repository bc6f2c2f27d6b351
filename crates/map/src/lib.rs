//! Map rendering for clinic search results.
//!
//! The renderer is map-library agnostic. Each call produces a [`RenderFrame`]:
//! the complete marker set, the difference from the previous frame keyed by
//! [`MarkerKey`], and a viewport fit request. Frames export to GeoJSON for any
//! web map.
//!
//! # Example
//!
//! ```rust
//! use clinicfinder_map::MapRenderer;
//! use clinicfinder_geo::Coordinate;
//!
//! let mut renderer = MapRenderer::new(40).unwrap();
//! let frame = renderer.render(&[], Some(Coordinate::new(42.33, -83.05))).unwrap();
//! assert_eq!(frame.markers.len(), 1);
//! assert!(!frame.fit.unwrap().animate);
//! ```

pub mod category;
pub mod error;
pub mod marker;
pub mod popup;
pub mod render;
pub mod viewport;

pub use category::{classify, Category};
pub use error::{MapError, Result};
pub use marker::{Marker, MarkerIcon, MarkerKey};
pub use popup::{Popup, PopupRenderer};
pub use render::{MapRenderer, MarkerDiff, RenderFrame};
pub use viewport::{Bounds, FitRequest};
