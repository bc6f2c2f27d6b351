//! Clinic records for the clinic finder
//!
//! This crate owns the canonical [`ClinicRecord`] shape and everything needed
//! to get there from loosely typed stored documents:
//!
//! - **Normalization**: coordinates, tag lists and opening hours in any of
//!   their historical shapes
//! - **Store contract**: [`DocumentStore`] with live change feeds and point lookups
//! - **Stores**: an in-memory store and a JSON file store that reloads on change
//! - **Record stream**: [`ClinicStream`], a live, normalized view of a collection
//!
//! # Example
//!
//! ```rust,no_run
//! use clinicfinder_geo::BoundingBox;
//! use clinicfinder_records::{ClinicStream, JsonFileStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::open("clinics.json", "clinics")?.watch()?;
//! let mut stream = ClinicStream::open(&store, "clinics", BoundingBox::CONTINENTAL_US)?;
//!
//! while let Some(view) = stream.changed().await {
//!     println!("{} clinics on the map", view.clinics.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod clinic;
pub mod document;
pub mod error;
pub mod file_store;
pub mod hours;
pub mod store;
pub mod stream;
pub mod tags;

pub use clinic::{normalize_snapshot, ClinicRecord};
pub use document::{FeedEvent, RawDocument};
pub use error::{RecordError, StoreError, StoreResult};
pub use file_store::JsonFileStore;
pub use hours::{Hours, Weekday};
pub use store::{find_clinic, DocumentStore, MemoryStore};
pub use stream::{ClinicStream, ClinicView, Subscription};
pub use tags::normalize_tags;
