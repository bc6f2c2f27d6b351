//! Watch command - re-run a search whenever the clinic export changes

use crate::commands::search::{print_table, timed_search};
use crate::context::Context;
use crate::QueryArgs;
use anyhow::Result;
use clinicfinder_cli::output::{format_count, format_duration, Status};
use clinicfinder_geo::Coordinate;
use clinicfinder_map::{MapRenderer, MarkerDiff};
use clinicfinder_records::{ClinicStream, ClinicView};
use clinicfinder_search::SearchParams;
use owo_colors::OwoColorize;

/// Run watch command until Ctrl-C
pub async fn run(ctx: &Context, query: &QueryArgs) -> Result<()> {
    let reference = ctx.reference(query).await?;
    let params = ctx.search_params(query, reference)?;

    let store = ctx.open_store()?.watch()?;
    let mut stream = ClinicStream::open(&store, ctx.collection(), ctx.region())?;
    let mut renderer = MapRenderer::new(ctx.config.schema.map.padding_px)?;

    Status::info(&format!(
        "Watching {} (Ctrl-C to stop)",
        store.path().display()
    ));

    loop {
        tokio::select! {
            next = stream.changed() => {
                let Some(view) = next else {
                    Status::warning("Clinic feed ended");
                    break;
                };
                report(&view, &params, reference, &mut renderer)?;
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    stream.unsubscribe();
    Ok(())
}

fn report(
    view: &ClinicView,
    params: &SearchParams,
    reference: Option<Coordinate>,
    renderer: &mut MapRenderer,
) -> Result<()> {
    if let Some(message) = &view.error {
        Status::warning(&format!("Feed error, showing last known clinics: {message}"));
    }
    if !view.is_loaded() {
        return Ok(());
    }

    let (results, elapsed) = timed_search(&view.clinics, params);
    let frame = renderer.render(&results, reference)?;

    println!();
    println!(
        "{} {} in {}  {}",
        format!("#{}", view.revision).blue().bold(),
        format_count(results.len(), "match", "matches"),
        format_duration(elapsed),
        describe_diff(&frame.diff).dimmed()
    );
    if view.dropped > 0 {
        Status::warning(&format!(
            "Skipped {} without usable coordinates",
            format_count(view.dropped, "record", "records")
        ));
    }
    if !results.is_empty() {
        print_table(&results);
    }
    Ok(())
}

fn describe_diff(diff: &MarkerDiff) -> String {
    if diff.is_empty() {
        "no marker changes".to_string()
    } else {
        format!(
            "+{} ~{} -{}",
            diff.added.len(),
            diff.updated.len(),
            diff.removed.len()
        )
    }
}
