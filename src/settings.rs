use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::cli::Cli;

/// Startup configuration. Read once; changes need a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub poll_interval_secs: u64,
    /// Extension of measurement files, without the leading dot.
    pub extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: Path::new("..").join("proof").join("DataSet"),
            poll_interval_secs: 30,
            extension: "h5".into(),
        }
    }
}

impl Settings {
    /// Defaults, overlaid by the optional settings file, overlaid by
    /// environment variables and flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(dir) = &cli.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(secs) = cli.poll_interval_secs {
            settings.poll_interval_secs = secs;
        }
        if let Some(extension) = &cli.extension {
            settings.extension = extension.clone();
        }

        settings.validate()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn validate(mut self) -> Result<Self> {
        if self.poll_interval_secs == 0 {
            bail!("poll interval must be at least 1 second");
        }
        self.extension = self.extension.trim_start_matches('.').to_string();
        if self.extension.is_empty() {
            bail!("measurement file extension must not be empty");
        }
        Ok(self)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
