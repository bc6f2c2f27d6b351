//! CLI command implementations

pub mod geocode;
pub mod locale;
pub mod map;
pub mod search;
pub mod services;
pub mod show;
pub mod watch;
