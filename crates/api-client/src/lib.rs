//! Geocoding and location clients for the clinic finder
//!
//! This crate turns free-text addresses and device positions into reference
//! points for distance search.
//!
//! # Features
//!
//! - **Environment-based configuration**: geocoder URL, User-Agent and timeout from env
//! - **Retry with exponential backoff**: automatic retry for transient failures
//! - **Circuit breaker**: stop calling a geocoder that is down
//! - **Rate limiting**: stay inside the public Nominatim usage policy
//! - **Debounced suggestions**: one request per typing burst, stale answers discarded
//! - **Device location contract**: failures and timeouts degrade to "no location"
//!
//! # Example
//!
//! ```rust,no_run
//! use clinicfinder_api_client::{AddressResolver, GeoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeoClient::new()?;
//!     let resolver = AddressResolver::new(client.geocode());
//!
//!     for suggestion in resolver.resolve("1726 Howard St, Detroit").await {
//!         println!("{} ({}, {})", suggestion.label, suggestion.lat, suggestion.lon);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod geolocation;
pub mod resolver;

pub use client::GeoClient;
pub use config::{ClientConfig, Environment};
pub use endpoints::{GeocodeApi, Suggestion};
pub use error::{ApiError, ApiResult};
pub use geolocation::{locate_or_none, FixedLocation, LocationError, LocationProvider};
pub use resolver::{AddressResolver, Geocoder, ResolverSettings, Suggestions};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::GeoClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{GeocodeApi, Suggestion};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::geolocation::{locate_or_none, FixedLocation, LocationProvider};
    pub use crate::resolver::{AddressResolver, Geocoder, Suggestions};
}
