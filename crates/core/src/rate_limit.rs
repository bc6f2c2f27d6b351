//! Token-bucket rate limiting for outbound service calls
//!
//! Public geocoding services publish hard usage limits (Nominatim allows one
//! request per second per client). Buckets are keyed so several upstream
//! endpoints can share one limiter.
//!
//! # Example
//!
//! ```rust
//! use clinicfinder_core::rate_limit::{RateLimiter, RateLimitConfig};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_second(1));
//! assert!(limiter.try_acquire("search"));
//! assert!(!limiter.try_acquire("search"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window over which `max_requests` refill
    pub window: Duration,
    /// Extra requests allowed on top of `max_requests` in a burst
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_second(1)
    }
}

impl RateLimitConfig {
    /// `max` requests per second, no burst allowance
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: 0,
        }
    }

    /// No practical limit; used in tests and for local fixtures
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_requests: u32::MAX / 2,
            window: Duration::from_secs(1),
            burst: 0,
        }
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests) + f64::from(self.burst)
    }

    fn refill_per_sec(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64().max(f64::EPSILON)
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(config: &RateLimitConfig) -> Self {
        Self {
            tokens: config.capacity(),
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, config: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_per_sec()).min(config.capacity());
        self.last_update = now;
    }
}

/// Keyed token-bucket limiter
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter where every key gets a bucket of this shape
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
        }
    }

    fn with_bucket<T>(&self, key: &str, f: impl FnOnce(&mut TokenBucket, &RateLimitConfig) -> T) -> T {
        // A poisoned lock still guards valid bucket state
        let mut buckets = self.buckets.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(&self.config));
        bucket.refill(&self.config);
        f(bucket, &self.config)
    }

    /// Take one token for `key` if available
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.with_bucket(key, |bucket, _| {
            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                true
            } else {
                false
            }
        })
    }

    /// How long until a token for `key` becomes available
    #[must_use]
    pub fn time_until_available(&self, key: &str) -> Duration {
        self.with_bucket(key, |bucket, config| {
            if bucket.tokens >= 1.0 {
                Duration::ZERO
            } else {
                Duration::from_secs_f64((1.0 - bucket.tokens) / config.refill_per_sec())
            }
        })
    }

    /// Forget the bucket for `key`
    pub fn reset(&self, key: &str) {
        let mut buckets = self.buckets.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        buckets.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_includes_burst() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
            burst: 1,
        });

        let granted = (0..5).filter(|_| limiter.try_acquire("search")).count();
        assert_eq!(granted, 3);
    }

    #[test]
    fn test_unlimited_never_blocks() {
        let limiter = RateLimiter::new(RateLimitConfig::unlimited());
        assert!((0..1000).all(|_| limiter.try_acquire("search")));
        assert_eq!(limiter.time_until_available("search"), Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_keys_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert!(limiter.try_acquire("search"));
        assert!(!limiter.try_acquire("search"));
        assert!(limiter.try_acquire("reverse"));
    }

    #[test]
    fn test_time_until_available() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert_eq!(limiter.time_until_available("search"), Duration::ZERO);
        assert!(limiter.try_acquire("search"));
        let wait = limiter.time_until_available("search");
        assert!(wait > Duration::ZERO && wait <= Duration::from_secs(1));
    }

    #[test]
    fn test_reset() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert!(limiter.try_acquire("search"));
        limiter.reset("search");
        assert!(limiter.try_acquire("search"));
    }
}
