//! Map command - export search results as GeoJSON markers

use crate::commands::search::timed_search;
use crate::context::Context;
use crate::QueryArgs;
use anyhow::{Context as _, Result};
use clinicfinder_cli::output::{format_count, Status};
use clinicfinder_map::MapRenderer;
use std::path::Path;

/// Run map command
pub async fn run(ctx: &Context, query: &QueryArgs, out: Option<&Path>) -> Result<()> {
    let view = ctx.load_clinics().await?;
    let reference = ctx.reference(query).await?;
    let params = ctx.search_params(query, reference)?;

    let (results, _) = timed_search(&view.clinics, &params);
    let mut renderer = MapRenderer::new(ctx.config.schema.map.padding_px)?;
    let frame = renderer.render(&results, reference)?;
    let geojson = serde_json::to_string_pretty(&frame.to_geojson())?;

    match out {
        Some(path) => {
            std::fs::write(path, geojson)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Status::success(&format!(
                "Wrote {} to {}",
                format_count(frame.markers.len(), "marker", "markers"),
                path.display()
            ));
        }
        None => println!("{geojson}"),
    }
    Ok(())
}
