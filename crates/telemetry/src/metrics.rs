//! In-process metrics
//!
//! Counters only grow, gauges hold the last value set, and histograms keep
//! the most recent [`HISTOGRAM_WINDOW`] samples so a long-running watch
//! does not grow without bound.

use crate::session_id;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Samples kept per histogram
pub const HISTOGRAM_WINDOW: usize = 1024;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// The process-wide registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

#[derive(Default)]
struct Series {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, u64>,
    histograms: BTreeMap<String, VecDeque<f64>>,
}

/// Named counters, gauges and histograms
pub struct MetricsRegistry {
    series: Mutex<Series>,
    started: Instant,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    /// Empty registry, independent of the global one
    pub fn new() -> Self {
        Self {
            series: Mutex::new(Series::default()),
            started: Instant::now(),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Series) -> R) -> R {
        let mut series = self.series.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut series)
    }

    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    pub fn increment_by(&self, name: &str, value: u64) {
        if value == 0 {
            return;
        }
        self.with(|s| {
            let counter = s.counters.entry(name.to_string()).or_default();
            *counter = counter.saturating_add(value);
        });
    }

    /// Counter value, zero if never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.with(|s| s.counters.get(name).copied().unwrap_or(0))
    }

    pub fn gauge(&self, name: &str, value: u64) {
        self.with(|s| {
            s.gauges.insert(name.to_string(), value);
        });
    }

    pub fn gauge_value(&self, name: &str) -> Option<u64> {
        self.with(|s| s.gauges.get(name).copied())
    }

    /// Add a sample, evicting the oldest once the window is full
    pub fn histogram(&self, name: &str, value: f64) {
        self.with(|s| {
            let samples = s.histograms.entry(name.to_string()).or_default();
            if samples.len() == HISTOGRAM_WINDOW {
                samples.pop_front();
            }
            samples.push_back(value);
        });
    }

    pub fn histogram_stats(&self, name: &str) -> Option<HistogramStats> {
        self.with(|s| s.histograms.get(name).and_then(HistogramStats::from_samples))
    }

    /// Everything recorded so far, tagged with the session id
    pub fn export_json(&self) -> serde_json::Value {
        let (counters, gauges, histograms) = self.with(|s| {
            let histograms: BTreeMap<String, HistogramStats> = s
                .histograms
                .iter()
                .filter_map(|(name, samples)| Some((name.clone(), HistogramStats::from_samples(samples)?)))
                .collect();
            (s.counters.clone(), s.gauges.clone(), histograms)
        });

        serde_json::json!({
            "session_id": session_id(),
            "exported_at": Utc::now(),
            "uptime_secs": self.started.elapsed().as_secs(),
            "counters": counters,
            "gauges": gauges,
            "histograms": histograms,
        })
    }
}

/// Summary of a histogram window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl HistogramStats {
    fn from_samples(samples: &VecDeque<f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        #[allow(clippy::cast_precision_loss)]
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            p50: nearest_rank(&sorted, 50),
            p95: nearest_rank(&sorted, 95),
        })
    }
}

/// Nearest-rank percentile of a non-empty sorted slice
fn nearest_rank(sorted: &[f64], percent: usize) -> f64 {
    let rank = (percent * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

/// Records its elapsed milliseconds into a histogram exactly once
///
/// Recording happens on [`Timer::stop`] or when the timer is dropped.
pub struct Timer {
    name: &'static str,
    started: Option<Instant>,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Some(Instant::now()),
        }
    }

    /// Record now and return the elapsed time
    pub fn stop(mut self) -> Duration {
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        let Some(started) = self.started.take() else {
            return Duration::ZERO;
        };
        let elapsed = started.elapsed();
        metrics().histogram(self.name, elapsed.as_secs_f64() * 1000.0);
        tracing::trace!(metric = self.name, elapsed_ms = elapsed.as_millis(), "timer recorded");
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;

    #[test]
    fn test_counters_accumulate() {
        let registry = MetricsRegistry::new();
        registry.increment(names::RECORDS_DROPPED);
        registry.increment_by(names::RECORDS_DROPPED, 3);
        registry.increment_by(names::RECORDS_DROPPED, 0);

        assert_eq!(registry.counter(names::RECORDS_DROPPED), 4);
        assert_eq!(registry.counter(names::GEOCODE_FAILURES), 0);
    }

    #[test]
    fn test_gauge_keeps_last_value() {
        let registry = MetricsRegistry::new();
        registry.gauge(names::MAP_MARKERS, 12);
        registry.gauge(names::MAP_MARKERS, 3);

        assert_eq!(registry.gauge_value(names::MAP_MARKERS), Some(3));
        assert_eq!(registry.gauge_value("never.set"), None);
    }

    #[test]
    fn test_histogram_summary() {
        let registry = MetricsRegistry::new();
        for v in 1..=20 {
            registry.histogram("latency", f64::from(v));
        }
        let stats = registry.histogram_stats("latency").unwrap();

        assert_eq!(stats.count, 20);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 20.0);
        assert_eq!(stats.mean, 10.5);
        assert_eq!(stats.p50, 10.0);
        assert_eq!(stats.p95, 19.0);
        assert!(registry.histogram_stats("missing").is_none());
    }

    #[test]
    fn test_histogram_window_evicts_oldest() {
        let registry = MetricsRegistry::new();
        registry.histogram("window", 1_000_000.0);
        for _ in 0..HISTOGRAM_WINDOW {
            registry.histogram("window", 1.0);
        }
        let stats = registry.histogram_stats("window").unwrap();
        assert_eq!(stats.count, HISTOGRAM_WINDOW);
        assert_eq!(stats.max, 1.0);
    }

    #[test]
    fn test_timer_records_once() {
        const NAME: &str = "test.timer_records_once";
        let timer = Timer::start(NAME);
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.stop() >= Duration::from_millis(5));

        let stats = metrics().histogram_stats(NAME).unwrap();
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_export_json() {
        let registry = MetricsRegistry::new();
        registry.increment(names::RECORDS_PUBLISHED);
        registry.histogram(names::SEARCH_DURATION_MS, 2.5);

        let exported = registry.export_json();
        assert_eq!(exported["session_id"], session_id());
        assert_eq!(exported["counters"][names::RECORDS_PUBLISHED], 1);
        assert_eq!(exported["histograms"][names::SEARCH_DURATION_MS]["count"], 1);
    }
}
