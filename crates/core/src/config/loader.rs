//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed configuration values
    pub schema: ConfigSchema,
    /// File the values were read from, if any
    pub path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; without one, the standard locations are
    /// searched and defaults are used when none is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self {
            schema: toml::from_str(content)?,
            path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let region = &self.schema.region;
        if !(region.min_lat < region.max_lat && region.min_lng < region.max_lng) {
            return Err(Error::config_invalid(format!(
                "region bounds are inverted: lat {}..{}, lng {}..{}",
                region.min_lat, region.max_lat, region.min_lng, region.max_lng
            )));
        }

        let radius = self.schema.search.radius_miles;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::config_invalid(format!(
                "search.radius_miles must be a positive number, got {radius}"
            )));
        }

        if self.schema.geocoder.debounce_ms > 2000 {
            return Err(Error::config_invalid("geocoder.debounce_ms must be at most 2000")
                .with_suggestion("Typical values are 250-300 ms"));
        }

        if self.schema.geocoder.user_agent.trim().is_empty() {
            return Err(Error::config_invalid("geocoder.user_agent cannot be empty")
                .with_suggestion("The geocoding service requires an identifying client signature"));
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".clinicfinder.toml",
        "clinicfinder.toml",
        ".config/clinicfinder.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {path}: {e}")).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("Parsing config file {path}"))
    })
}
