//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// Where clinic documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Document collection holding clinic records
    #[serde(default = "default_collection")]
    pub collection: String,

    /// JSON export of the collection used by the file-backed store
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            data_path: None,
        }
    }
}

fn default_collection() -> String {
    "clinics".to_string()
}

/// Service region used to disambiguate stored coordinate order.
///
/// Bounds are exclusive. Defaults to the contiguous continental range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_min_lat")]
    pub min_lat: f64,
    #[serde(default = "default_max_lat")]
    pub max_lat: f64,
    #[serde(default = "default_min_lng")]
    pub min_lng: f64,
    #[serde(default = "default_max_lng")]
    pub max_lng: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_lat: default_min_lat(),
            max_lat: default_max_lat(),
            min_lng: default_min_lng(),
            max_lng: default_max_lng(),
        }
    }
}

fn default_min_lat() -> f64 {
    24.0
}

fn default_max_lat() -> f64 {
    50.0
}

fn default_min_lng() -> f64 {
    -125.0
}

fn default_max_lng() -> f64 {
    -66.0
}

/// Defaults applied to searches when the caller does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius cutoff in miles (only applied with a reference point)
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,

    /// Hide clinics that have not been verified
    #[serde(default)]
    pub verified_only: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_miles: default_radius_miles(),
            verified_only: false,
        }
    }
}

fn default_radius_miles() -> f64 {
    25.0
}

/// Forward-geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// Identifying client signature required by the service usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Comma separated ISO country codes, empty for worldwide
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
            limit: default_limit(),
            country_codes: default_country_codes(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("clinicfinder/{} (dev@clinicfinder.org)", env!("CARGO_PKG_VERSION"))
}

fn default_min_query_len() -> usize {
    3
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_limit() -> u32 {
    5
}

fn default_country_codes() -> String {
    "us".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Map rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Padding around fitted bounds, in pixels
    #[serde(default = "default_padding_px")]
    pub padding_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            padding_px: default_padding_px(),
        }
    }
}

fn default_padding_px() -> u32 {
    40
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
