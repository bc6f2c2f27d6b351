//! Geocode command - look up an address

use crate::context::Context;
use anyhow::Result;
use clinicfinder_cli::output::Status;
use clinicfinder_cli::progress::{finish_clear, spinner};
use owo_colors::OwoColorize;

/// Run geocode command
///
/// Lookup failures are not errors: they print no suggestions.
pub async fn run(ctx: &Context, query: &str, json: bool) -> Result<()> {
    let resolver = ctx.resolver()?;

    let pb = spinner(&format!("Looking up {query}..."));
    let suggestions = resolver.resolve(query).await;
    finish_clear(&pb);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        if query.trim().chars().count() < resolver.settings().min_query_len {
            Status::warning(&format!(
                "Queries need at least {} characters",
                resolver.settings().min_query_len
            ));
        } else {
            Status::warning(&format!("No matches for '{query}'"));
        }
        return Ok(());
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        println!(
            "  {} {}  {}",
            format!("{}.", i + 1).dimmed(),
            suggestion.label,
            suggestion.coordinate().to_string().dimmed()
        );
    }
    Ok(())
}
