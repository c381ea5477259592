pub mod analysis;
pub mod cache;
pub mod cli;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod query;
pub mod settings;
pub mod timestamp;
mod utils;

use std::{process::ExitCode, sync::Arc};

use analysis::{analyzer_for_extension, Analyzer};
use anyhow::{Context, Result};
use cache::IngestionCache;
use clap::Parser;
use cli::{Cli, Command};
use ingest::{scan_once, IngestController, ScanJob};
use metrics::IngestMetrics;
use query::{get_detail, get_summary};
use settings::Settings;

/// Shared handles the query layer reads from. The ingest loop writes into
/// clones of the same cache and metrics.
#[derive(Clone, Default)]
pub struct AppState {
    pub cache: IngestionCache,
    pub metrics: IngestMetrics,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub async fn run() -> Result<ExitCode> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    let state = AppState::new();
    let analyzer = analyzer_for_extension(&settings.extension)?;

    log::info!(
        "thermal-ingest starting up (dir={}, interval={}s, extension=.{})",
        settings.data_dir.display(),
        settings.poll_interval_secs,
        settings.extension
    );

    match cli.command.clone().unwrap_or(Command::Run) {
        Command::Run => {
            let mut controller =
                IngestController::new(state.cache.clone(), state.metrics.clone(), analyzer);
            controller.start(&settings)?;

            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for ctrl-c")?;
            log::info!("Interrupt received, stopping ingestion");

            controller.stop().await?;
            log::info!("Stopped with {} datasets cached", state.cache.len());
            Ok(ExitCode::SUCCESS)
        }
        Command::Once => {
            scan_now(&settings, &state, analyzer).await?;
            println!("{}", serde_json::to_string_pretty(&get_summary(&state))?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Detail { index } => {
            scan_now(&settings, &state, analyzer).await?;
            match get_detail(&state, index) {
                Ok(detail) => {
                    println!("{}", serde_json::to_string_pretty(detail.as_ref())?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    println!("{}", serde_json::to_string_pretty(&err)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Single synchronous pass for the one-shot commands.
async fn scan_now(settings: &Settings, state: &AppState, analyzer: Arc<dyn Analyzer>) -> Result<()> {
    let job = ScanJob {
        data_dir: settings.data_dir.clone(),
        extension: settings.extension.clone(),
        cache: state.cache.clone(),
        analyzer,
    };

    let pass = tokio::task::spawn_blocking(move || {
        scan_once(&job.data_dir, &job.extension, &job.cache, job.analyzer.as_ref())
    })
    .await
    .context("scan pass worker join failed")?;

    state.metrics.record_pass(pass).await;
    Ok(())
}
