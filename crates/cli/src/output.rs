//! Terminal output utilities
//!
//! Status lines go to stderr so that stdout carries only results.

use clinicfinder_geo::Distance;
use console::{pad_str, Alignment};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }
}

/// `35.5 mi`, `< 0.1 mi`, or `—` when there is no reference point
pub fn format_distance(distance: &Distance) -> String {
    if !distance.is_finite() {
        "—".to_string()
    } else if distance.miles < 0.1 {
        "< 0.1 mi".to_string()
    } else {
        format!("{:.1} mi", distance.miles)
    }
}

/// `3ms`, `5.5s`, or `2m 5s`
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Left-align `text` to `width` display columns, truncating with `…`
pub fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

/// Right-align `text` to `width` display columns
pub fn cell_right(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Right, None).into_owned()
}
