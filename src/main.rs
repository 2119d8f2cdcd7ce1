//! CLI entry point for the vaccination atlas.
//!
//! Loads the three CSV sources, builds the country/continent hierarchy and
//! either logs a per-continent summary or prints the records as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vax_atlas::config::SourcePaths;
use vax_atlas::ingest::load_atlas_concurrent;
use vax_atlas::output::{log_summary, to_json};

#[derive(Parser)]
#[command(name = "vax_atlas")]
#[command(about = "Aggregate country vaccination series into continents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the latest total for every continent
    Summary {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Print every country and continent record as JSON on stdout
    Export {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Vaccination CSV (overrides VAX_VACCINATIONS_CSV)
    #[arg(long)]
    vaccinations: Option<PathBuf>,

    /// Country coordinate CSV (overrides VAX_COORDINATES_CSV)
    #[arg(long)]
    coordinates: Option<PathBuf>,

    /// Continent membership CSV (overrides VAX_CONTINENTS_CSV)
    #[arg(long)]
    continents: Option<PathBuf>,
}

impl SourceArgs {
    fn resolve(self) -> SourcePaths {
        SourcePaths::from_env().with_overrides(self.vaccinations, self.coordinates, self.continents)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vax_atlas.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vax_atlas.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { sources } => {
            let paths = sources.resolve();
            info!(?paths, "Loading sources");
            let atlas = load_atlas_concurrent(&paths)
                .await
                .context("failed to build vaccination atlas")?;
            log_summary(&atlas)?;
        }
        Commands::Export { sources } => {
            let paths = sources.resolve();
            let atlas = load_atlas_concurrent(&paths)
                .await
                .context("failed to build vaccination atlas")?;
            println!("{}", to_json(&atlas)?);
        }
    }

    Ok(())
}
