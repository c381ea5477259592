mod grid;
#[cfg(feature = "hdf5")]
mod hdf5_reader;
mod reader;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

use crate::models::AnalysisResult;

pub use grid::{TemperatureGrid, ROI_FRACTION};
#[cfg(feature = "hdf5")]
pub use hdf5_reader::Hdf5GridAnalyzer;
pub use reader::{JsonGridAnalyzer, TEMPERATURE_FIELD};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[cfg(feature = "hdf5")]
    #[error("failed to read HDF5 file {path}: {source}")]
    Hdf5 {
        path: PathBuf,
        #[source]
        source: hdf5::Error,
    },
    #[error("temperature grid is empty")]
    Empty,
    #[error("temperature grid row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("temperature grid {rows}x{cols} is too small for a numerical gradient")]
    TooSmall { rows: usize, cols: usize },
}

/// Turns one measurement file into statistics and derived grids.
///
/// `Ok(None)` means the file has no temperature grid at all. Such files are
/// skipped and stay eligible for the next pass.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, path: &Path) -> Result<Option<AnalysisResult>, AnalysisError>;
}

#[derive(Debug, Error)]
#[error("no analyzer for .{extension} files (built without HDF5 support?)")]
pub struct UnsupportedExtension {
    pub extension: String,
}

/// Picks the reader for the configured extension: HDF5 for `h5`/`hdf5`,
/// the JSON grid layout for anything else.
pub fn analyzer_for_extension(extension: &str) -> Result<Arc<dyn Analyzer>, UnsupportedExtension> {
    match extension.to_ascii_lowercase().as_str() {
        #[cfg(feature = "hdf5")]
        "h5" | "hdf5" => Ok(Arc::new(Hdf5GridAnalyzer)),
        #[cfg(not(feature = "hdf5"))]
        "h5" | "hdf5" => Err(UnsupportedExtension {
            extension: extension.to_string(),
        }),
        _ => Ok(Arc::new(JsonGridAnalyzer)),
    }
}
