//! Shared command setup: configuration, logging, data and reference point

use crate::QueryArgs;
use anyhow::Result;
use clinicfinder_api_client::{AddressResolver, ClientConfig, GeoClient, GeocodeApi, ResolverSettings};
use clinicfinder_cli::output::Status;
use clinicfinder_cli::progress::{finish_clear, spinner};
use clinicfinder_core::config::Config;
use clinicfinder_core::Error;
use clinicfinder_geo::{BoundingBox, Coordinate};
use clinicfinder_records::{ClinicStream, ClinicView, JsonFileStore};
use clinicfinder_search::SearchParams;
use clinicfinder_telemetry::TelemetryConfig;
use std::path::PathBuf;
use tracing::debug;

/// Everything a command needs from the environment
pub struct Context {
    pub config: Config,
    data: Option<PathBuf>,
}

impl Context {
    /// Load configuration and start logging
    pub fn load(config_path: Option<&str>, data: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let config = Config::load(config_path)?;

        let level = if verbose {
            "clinicfinder=debug,info".to_string()
        } else {
            config.schema.telemetry.log_level.clone()
        };
        let telemetry = TelemetryConfig::with_level(level)
            .json(config.schema.telemetry.json)
            .explicit_level(verbose);
        clinicfinder_telemetry::init_with_config(telemetry)?;
        debug!(
            session_id = %clinicfinder_telemetry::session_id(),
            config = config.path.as_deref().unwrap_or("<defaults>"),
            "clinicfinder starting"
        );

        Ok(Self { config, data })
    }

    pub fn collection(&self) -> &str {
        &self.config.schema.general.collection
    }

    /// Service region from `[region]`
    pub fn region(&self) -> BoundingBox {
        let r = &self.config.schema.region;
        BoundingBox::new(r.min_lat, r.max_lat, r.min_lng, r.max_lng)
    }

    /// The clinic export: `--data` first, then `general.data_path`
    pub fn data_path(&self) -> Result<PathBuf> {
        self.data
            .clone()
            .or_else(|| self.config.schema.general.data_path.as_ref().map(PathBuf::from))
            .ok_or_else(|| {
                Error::config("No clinic data file configured")
                    .with_suggestion("Pass --data <file> or set general.data_path in .clinicfinder.toml")
                    .into()
            })
    }

    /// Open the clinic export without watching it
    pub fn open_store(&self) -> Result<JsonFileStore> {
        let path = self.data_path()?;
        JsonFileStore::open(&path, self.collection()).map_err(|e| {
            Error::data(format!("Cannot load {}", path.display()))
                .with_source(e)
                .into()
        })
    }

    /// Read the export once and normalize it
    ///
    /// Dropped records are reported; a failed feed is an error.
    pub async fn load_clinics(&self) -> Result<ClinicView> {
        let store = self.open_store()?;
        let mut stream = ClinicStream::open(&store, self.collection(), self.region())?;
        let view = stream
            .loaded()
            .await
            .ok_or_else(|| Error::data("Clinic feed closed before delivering any records"))?;
        stream.unsubscribe();

        if let Some(message) = &view.error {
            return Err(Error::data(format!("Clinic feed failed: {message}")).into());
        }
        if view.dropped > 0 {
            Status::warning(&format!(
                "Skipped {} without usable coordinates",
                clinicfinder_cli::output::format_count(view.dropped, "record", "records")
            ));
        }
        Ok(view)
    }

    /// Geocoder built from `[geocoder]` plus environment overrides
    pub fn resolver(&self) -> Result<AddressResolver<GeocodeApi>> {
        let settings = &self.config.schema.geocoder;
        let client = ClientConfig::from_settings(settings)
            .and_then(GeoClient::with_config)
            .map_err(Error::from)?;
        Ok(AddressResolver::with_settings(
            client.geocode(),
            ResolverSettings::from(settings),
        ))
    }

    /// Reference point from `--lat/--lng` or a geocoded `--near`
    ///
    /// An address that cannot be resolved leaves the search without a
    /// reference point rather than failing it.
    pub async fn reference(&self, query: &QueryArgs) -> Result<Option<Coordinate>> {
        if let (Some(lat), Some(lng)) = (query.lat, query.lng) {
            let coordinate =
                Coordinate::try_new(lat, lng).map_err(|e| Error::validation(e.to_string()))?;
            return Ok(Some(coordinate));
        }

        let Some(address) = query.near.as_deref() else {
            return Ok(None);
        };

        let resolver = self.resolver()?;
        let pb = spinner(&format!("Looking up {address}..."));
        let found = resolver.resolve_first(address).await;
        finish_clear(&pb);

        match found {
            Some(suggestion) => {
                Status::info(&format!("Searching near {}", suggestion.label));
                Ok(Some(suggestion.coordinate()))
            }
            None => {
                Status::warning(&format!("No match for '{address}', distances are unavailable"));
                Ok(None)
            }
        }
    }

    /// Pipeline parameters, with configuration defaults for unset flags
    pub fn search_params(&self, query: &QueryArgs, reference: Option<Coordinate>) -> Result<SearchParams> {
        let defaults = &self.config.schema.search;
        let params = SearchParams::new()
            .service(query.service.clone().unwrap_or_default())
            .verified_only(query.verified || defaults.verified_only)
            .reference(reference)
            .radius_miles(query.radius.unwrap_or(defaults.radius_miles));
        params.validate().map_err(|e| Error::validation(e.to_string()))?;
        Ok(params)
    }
}
