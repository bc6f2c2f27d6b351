//! Core utilities for the clinic finder
//!
//! This crate provides shared functionality used by every other crate in the workspace:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Resilience**: token-bucket rate limiting, retry backoff and a circuit breaker
//! - **Locale**: the display-language context and its persistence
//!
//! # Example
//!
//! ```rust,no_run
//! use clinicfinder_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! println!("radius: {} mi", config.schema.search.radius_miles);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod locale;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCode, Result};
pub use locale::{Locale, LocaleStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::locale::{Locale, LocaleStore};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, RetryConfig};
}
