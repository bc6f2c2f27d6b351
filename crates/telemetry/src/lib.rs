//! Logging and metrics for the clinic finder
//!
//! - Structured logging with tracing, filtered by `RUST_LOG` or configuration
//! - A process-wide metrics registry (counters, gauges, histograms)
//! - Operation timers feeding the registry
//! - A session id attached to startup logs and metric exports
//!
//! Well-known metric names live in [`names`].

mod metrics;

pub use metrics::{metrics, HistogramStats, MetricsRegistry, Timer};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Metric names recorded across the workspace
pub mod names {
    /// Stored documents dropped during normalization
    pub const RECORDS_DROPPED: &str = "records.dropped";
    /// Record snapshots published to subscribers
    pub const RECORDS_PUBLISHED: &str = "records.published";
    /// Geocoding requests that failed or returned garbage
    pub const GEOCODE_FAILURES: &str = "geocode.failures";
    /// Geocoding requests sent
    pub const GEOCODE_REQUESTS: &str = "geocode.requests";
    /// Time spent in one search pipeline run
    pub const SEARCH_DURATION_MS: &str = "search.duration_ms";
    /// Markers on the most recent rendered frame
    pub const MAP_MARKERS: &str = "map.markers";
}

/// Logging setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of the compact human format
    pub json: bool,
    /// Include the module path in each line
    pub show_target: bool,
    /// `log_level` came from an explicit flag and beats `RUST_LOG`
    pub explicit_level: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            show_target: false,
            explicit_level: false,
        }
    }
}

impl TelemetryConfig {
    /// Defaults with the given filter directive
    pub fn with_level(log_level: impl Into<String>) -> Self {
        Self {
            log_level: log_level.into(),
            ..Self::default()
        }
    }

    /// Switch between JSON and compact output
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Let `log_level` win over `RUST_LOG`
    #[must_use]
    pub fn explicit_level(mut self, explicit: bool) -> Self {
        self.explicit_level = explicit;
        self
    }

    /// Filter directive in effect given the value of `RUST_LOG`
    fn directive(&self, rust_log: Option<String>) -> String {
        match rust_log {
            Some(env) if !self.explicit_level && !env.trim().is_empty() => env,
            _ => self.log_level.clone(),
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.log_level` unless the level was
/// set explicitly. Logs go to stderr so command output on stdout stays
/// machine readable. Fails if a subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let directive = config.directive(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target);
    let installed = if config.json {
        tracing_subscriber::registry().with(filter).with(layer.json()).try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(layer.compact()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "telemetry initialized"
    );
    Ok(())
}

/// Random id for this process, shared by logs and metric exports
pub fn session_id() -> &'static str {
    &SESSION_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_stable_uuid() {
        let id = session_id();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(id, session_id());
    }

    #[test]
    fn test_config_builders() {
        let config = TelemetryConfig::with_level("clinicfinder=debug").json(true);
        assert_eq!(config.log_level, "clinicfinder=debug");
        assert!(config.json);
        assert!(!config.show_target);
    }

    #[test]
    fn test_rust_log_wins_unless_level_is_explicit() {
        let config = TelemetryConfig::with_level("clinicfinder=debug,info");
        assert_eq!(config.directive(Some("warn".into())), "warn");
        assert_eq!(config.directive(Some("  ".into())), "clinicfinder=debug,info");
        assert_eq!(config.directive(None), "clinicfinder=debug,info");

        let explicit = config.explicit_level(true);
        assert_eq!(explicit.directive(Some("warn".into())), "clinicfinder=debug,info");
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.json);
        assert!(!config.explicit_level);
    }
}
