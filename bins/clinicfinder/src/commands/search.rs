//! Search command - filter and rank clinics

use crate::context::Context;
use crate::QueryArgs;
use anyhow::Result;
use clinicfinder_cli::output::{cell, cell_right, format_count, format_distance, Status};
use clinicfinder_geo::Coordinate;
use clinicfinder_records::ClinicRecord;
use clinicfinder_search::{search, RankedClinic, SearchParams};
use clinicfinder_telemetry::{names, Timer};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Duration;

/// JSON output for search
#[derive(Debug, Serialize)]
struct JsonSearchOutput<'a> {
    reference: Option<Coordinate>,
    radius_miles: Option<f64>,
    total: usize,
    results: &'a [RankedClinic<'a>],
}

/// Run search command
pub async fn run(ctx: &Context, query: &QueryArgs, json: bool) -> Result<()> {
    let view = ctx.load_clinics().await?;
    let reference = ctx.reference(query).await?;
    let params = ctx.search_params(query, reference)?;

    let (results, _) = timed_search(&view.clinics, &params);

    if json {
        let output = JsonSearchOutput {
            reference,
            radius_miles: reference.map(|_| params.radius_miles),
            total: results.len(),
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if results.is_empty() {
        Status::warning("No clinics match this search");
        return Ok(());
    }

    print_table(&results);
    println!();
    println!(
        "  {} of {}",
        format_count(results.len(), "clinic", "clinics"),
        view.clinics.len()
    );
    Ok(())
}

/// Run the pipeline and record its duration under `search.duration_ms`
pub fn timed_search<'a>(clinics: &'a [ClinicRecord], params: &SearchParams) -> (Vec<RankedClinic<'a>>, Duration) {
    let timer = Timer::start(names::SEARCH_DURATION_MS);
    let results = search(clinics, params);
    (results, timer.stop())
}

/// Aligned result table on stdout
pub fn print_table(results: &[RankedClinic<'_>]) {
    println!(
        "  {} {} {} {}",
        cell_right("Distance", 9).dimmed(),
        cell("Name", 32).dimmed(),
        cell("Services", 28).dimmed(),
        "Verified".dimmed()
    );
    println!("  {}", "─".repeat(80).dimmed());

    for ranked in results {
        let clinic = ranked.clinic;
        let verified = if clinic.verified {
            "✓".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {} {} {}",
            cell_right(&format_distance(&ranked.distance), 9),
            cell(&clinic.name, 32).bold(),
            cell(&clinic.services.join(", "), 28),
            verified
        );
    }
}
