use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "thermal-ingest", version, about = "Thermal capture ingestion service")]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory scanned for measurement files
    #[arg(long, env = "THERMAL_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Seconds between scan passes
    #[arg(long = "interval", env = "THERMAL_POLL_INTERVAL_SECS", global = true)]
    pub poll_interval_secs: Option<u64>,

    /// Measurement file extension
    #[arg(long, env = "THERMAL_EXTENSION", global = true)]
    pub extension: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Poll the data directory until interrupted (default)
    Run,
    /// Scan once and print the summary series as JSON
    Once,
    /// Scan once and print one dataset's detail as JSON
    Detail { index: usize },
}
