//! Endpoint-specific API implementations
//!
//! | Module | Upstream endpoint | Description |
//! |--------|-------------------|-------------|
//! | `geocode` | Nominatim `/search` | Forward geocoding of free-text addresses |

pub mod geocode;

pub use geocode::{GeocodeApi, Suggestion};
