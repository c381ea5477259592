use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `(row, column)` position inside a grid. Serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCoord(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub hot_spot_coords: GridCoord,
    pub cold_spot_coords: GridCoord,
}

/// Derived grids for one capture. All three share the source grid's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalMatrices {
    pub temperature: Vec<Vec<f64>>,
    pub gradient_magnitude: Vec<Vec<f64>>,
    pub hot_roi: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub stats: ThermalStats,
    pub matrices: ThermalMatrices,
}

/// One point of the time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub timestamp: NaiveDateTime,
    pub max_temp: f64,
    pub min_temp: f64,
}

impl SummaryEntry {
    pub fn from_analysis(timestamp: NaiveDateTime, result: &AnalysisResult) -> Self {
        Self {
            timestamp,
            max_temp: result.stats.max,
            min_temp: result.stats.min,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub filename: String,
    pub stats: ThermalStats,
    pub matrices: ThermalMatrices,
}

impl DetailEntry {
    pub fn new(filename: String, result: AnalysisResult) -> Self {
        Self {
            filename,
            stats: result.stats,
            matrices: result.matrices,
        }
    }
}
