//! Address resolution with debounced suggestions
//!
//! Typing produces a burst of queries. [`AddressResolver::suggest`] waits out
//! a debounce window and only the newest call in a burst reaches the
//! geocoder. Every call takes a generation number; a call whose generation
//! has been overtaken returns [`Suggestions::Superseded`], even if its
//! request already completed.

use crate::endpoints::{GeocodeApi, Suggestion};
use crate::error::ApiResult;
use clinicfinder_core::config::GeocoderConfig;
use clinicfinder_telemetry::{metrics, names};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can turn text into candidate locations
pub trait Geocoder: Send + Sync {
    /// Look up `query`, returning at most `limit` suggestions
    fn search(&self, query: &str, limit: u32) -> impl Future<Output = ApiResult<Vec<Suggestion>>> + Send;
}

impl Geocoder for GeocodeApi {
    async fn search(&self, query: &str, limit: u32) -> ApiResult<Vec<Suggestion>> {
        GeocodeApi::search(self, query, limit).await
    }
}

/// Resolver tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Trimmed queries shorter than this never reach the geocoder
    pub min_query_len: usize,
    /// Quiet period before a suggestion request is sent
    pub debounce: Duration,
    /// Maximum suggestions per query
    pub limit: u32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce: Duration::from_millis(300),
            limit: 5,
        }
    }
}

impl From<&GeocoderConfig> for ResolverSettings {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            min_query_len: config.min_query_len,
            debounce: Duration::from_millis(config.debounce_ms),
            limit: config.limit,
        }
    }
}

/// Outcome of a debounced suggestion call
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestions {
    /// Results for the newest query; empty on failure or short input
    Ready(Vec<Suggestion>),
    /// A newer call arrived; discard this one
    Superseded,
}

impl Suggestions {
    /// The suggestions, or `None` if superseded
    #[must_use]
    pub fn into_ready(self) -> Option<Vec<Suggestion>> {
        match self {
            Self::Ready(list) => Some(list),
            Self::Superseded => None,
        }
    }
}

/// Turns free-text addresses into candidate reference points
pub struct AddressResolver<G> {
    geocoder: G,
    settings: ResolverSettings,
    generation: AtomicU64,
}

impl<G: Geocoder> AddressResolver<G> {
    /// Resolver with default settings
    pub fn new(geocoder: G) -> Self {
        Self::with_settings(geocoder, ResolverSettings::default())
    }

    /// Resolver with explicit settings
    pub fn with_settings(geocoder: G, settings: ResolverSettings) -> Self {
        Self {
            geocoder,
            settings,
            generation: AtomicU64::new(0),
        }
    }

    /// Current settings
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve immediately, without debouncing
    ///
    /// Short queries return nothing without a request. Failures are logged
    /// and also return nothing.
    pub async fn resolve(&self, query: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.chars().count() < self.settings.min_query_len {
            return Vec::new();
        }

        match self.geocoder.search(query, self.settings.limit).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                metrics().increment(names::GEOCODE_FAILURES);
                warn!(query, error = %e, "address lookup failed");
                Vec::new()
            }
        }
    }

    /// Best single match for `query`
    pub async fn resolve_first(&self, query: &str) -> Option<Suggestion> {
        self.resolve(query).await.into_iter().next()
    }

    /// Debounced lookup for type-ahead input
    pub async fn suggest(&self, query: &str) -> Suggestions {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().chars().count() < self.settings.min_query_len {
            return Suggestions::Ready(Vec::new());
        }

        tokio::time::sleep(self.settings.debounce).await;
        if !self.is_current(generation) {
            debug!(generation, "suggestion superseded during debounce");
            return Suggestions::Superseded;
        }

        let results = self.resolve(query).await;
        if !self.is_current(generation) {
            debug!(generation, "suggestion superseded in flight");
            return Suggestions::Superseded;
        }

        Suggestions::Ready(results)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
        latency: Duration,
        fail: bool,
    }

    impl FakeGeocoder {
        fn slow(latency: Duration) -> Self {
            Self {
                latency,
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn search(&self, query: &str, _limit: u32) -> ApiResult<Vec<Suggestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.fail {
                return Err(ApiError::api_response(503, "unavailable"));
            }
            Ok(vec![Suggestion {
                label: query.to_string(),
                lat: 42.33,
                lon: -83.05,
            }])
        }
    }

    #[tokio::test]
    async fn test_short_query_makes_no_request() {
        let resolver = AddressResolver::new(FakeGeocoder::default());
        assert!(resolver.resolve("ab").await.is_empty());
        assert!(resolver.resolve("   a  ").await.is_empty());
        assert_eq!(resolver.geocoder.calls(), 0);

        assert_eq!(resolver.resolve(" abc ").await.len(), 1);
        assert_eq!(*resolver.geocoder.queries.lock().unwrap(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let resolver = AddressResolver::new(FakeGeocoder::failing());
        assert!(resolver.resolve("Detroit").await.is_empty());
        assert!(resolver.resolve_first("Detroit").await.is_none());
        assert_eq!(resolver.geocoder.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_sends_one_request() {
        let resolver = Arc::new(AddressResolver::new(FakeGeocoder::default()));
        let mut handles = Vec::new();

        for query in ["Det", "Detr", "Detro", "Detroi", "Detroit"] {
            let r = Arc::clone(&resolver);
            let query = query.to_string();
            handles.push(tokio::spawn(async move { r.suggest(&query).await }));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(resolver.geocoder.calls(), 1);
        assert!(outcomes[..4].iter().all(|o| *o == Suggestions::Superseded));
        let last = outcomes.pop().unwrap().into_ready().unwrap();
        assert_eq!(last[0].label, "Detroit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_response_discarded() {
        let resolver = Arc::new(AddressResolver::new(FakeGeocoder::slow(Duration::from_millis(500))));

        let first = {
            let r = Arc::clone(&resolver);
            tokio::spawn(async move { r.suggest("Ann Arbor").await })
        };
        // Past the debounce window, the first request is in flight
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = {
            let r = Arc::clone(&resolver);
            tokio::spawn(async move { r.suggest("Ann Arbor, MI").await })
        };

        assert_eq!(first.await.unwrap(), Suggestions::Superseded);
        let ready = second.await.unwrap().into_ready().unwrap();
        assert_eq!(ready[0].label, "Ann Arbor, MI");
        assert_eq!(resolver.geocoder.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_supersedes_pending_lookup() {
        let resolver = Arc::new(AddressResolver::new(FakeGeocoder::default()));
        let pending = {
            let r = Arc::clone(&resolver);
            tokio::spawn(async move { r.suggest("Lansing").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(resolver.suggest("").await, Suggestions::Ready(Vec::new()));
        assert_eq!(pending.await.unwrap(), Suggestions::Superseded);
        assert_eq!(resolver.geocoder.calls(), 0);
    }

    #[test]
    fn test_settings_from_config() {
        let config = GeocoderConfig {
            debounce_ms: 250,
            ..GeocoderConfig::default()
        };
        let settings = ResolverSettings::from(&config);
        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.min_query_len, 3);
    }
}
