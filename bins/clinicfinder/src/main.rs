//! clinicfinder - find free and low-cost clinics near you
//!
//! Loads a clinic export, resolves a reference point and runs the
//! filter/sort pipeline, printing a table, JSON, or GeoJSON map markers.

use clap::{Args, Parser, Subcommand};
use clinicfinder_core::error::exit_codes;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;

use commands::{geocode, locale, map, search, services, show, watch};
use context::Context;

/// Find free and low-cost clinics near you
#[derive(Parser)]
#[command(name = "clinicfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to .clinicfinder.toml in the working directory)
    #[arg(short, long, global = true, env = "CLINICFINDER_CONFIG")]
    config: Option<String>,

    /// Clinic export to read instead of general.data_path
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Print collected metrics as JSON to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search clinics by service and distance
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render search results as GeoJSON map markers
    Map {
        #[command(flatten)]
        query: QueryArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Re-run a search every time the clinic export changes
    Watch {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show one clinic by id, slug or legacy id
    Show {
        /// Clinic id, slug or legacy id
        key: String,

        /// Summary language (defaults to the saved locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the services offered across all clinics
    Services,

    /// Look up an address
    Geocode {
        /// Free-text address or place name
        query: String,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the display language
    Locale {
        #[command(subcommand)]
        action: Option<LocaleAction>,
    },
}

#[derive(Subcommand)]
enum LocaleAction {
    /// Print the saved locale
    Get,
    /// Save a new locale
    Set {
        /// Locale code (en, es)
        code: String,
    },
    /// List supported locales
    List,
}

/// Search inputs shared by `search`, `map` and `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Only clinics offering this service (case-insensitive substring)
    #[arg(short, long)]
    pub service: Option<String>,

    /// Only verified clinics
    #[arg(long)]
    pub verified: bool,

    /// Reference latitude
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Reference longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Reference address, geocoded to the best match
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub near: Option<String>,

    /// Search radius in miles (ignored without a reference point)
    #[arg(short, long)]
    pub radius: Option<f64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(cli.config.as_deref(), cli.data, cli.verbose)?;

    let result = dispatch(&ctx, cli.command).await;
    if cli.metrics {
        let exported = clinicfinder_telemetry::metrics().export_json();
        eprintln!("{}", serde_json::to_string_pretty(&exported)?);
    }
    result
}

async fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, json } => search::run(ctx, &query, json).await,
        Commands::Map { query, out } => map::run(ctx, &query, out.as_deref()).await,
        Commands::Watch { query } => watch::run(ctx, &query).await,
        Commands::Show { key, locale, json } => show::run(ctx, &key, locale.as_deref(), json),
        Commands::Services => services::run(ctx).await,
        Commands::Geocode { query, json } => geocode::run(ctx, &query, json).await,
        Commands::Locale { action } => match action.unwrap_or(LocaleAction::Get) {
            LocaleAction::Get => locale::get(),
            LocaleAction::Set { code } => locale::set(&code),
            LocaleAction::List => locale::list(),
        },
    }
}

/// Coded errors choose the exit status; anything else is a plain failure
fn exit_code_for(error: &anyhow::Error) -> u8 {
    let code = error
        .downcast_ref::<clinicfinder_core::Error>()
        .map_or(exit_codes::FAILURE, clinicfinder_core::Error::exit_code);
    u8::try_from(code).unwrap_or(1)
}
