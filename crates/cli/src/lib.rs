//! Terminal helpers for the clinic finder command line
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Distance, count and duration formatting
//! - Aligned table cells that tolerate ANSI colors
//! - Spinners for network waits

#![warn(missing_docs)]

pub mod output;
pub mod progress;
