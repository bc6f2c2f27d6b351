//! Services command - list the service filter options

use crate::context::Context;
use anyhow::Result;
use clinicfinder_cli::output::Status;
use clinicfinder_search::service_options;

/// Run services command
pub async fn run(ctx: &Context) -> Result<()> {
    let view = ctx.load_clinics().await?;
    let options = service_options(&view.clinics);

    if options.is_empty() {
        Status::warning("No clinic lists any services");
        return Ok(());
    }
    for service in options {
        println!("{service}");
    }
    Ok(())
}
