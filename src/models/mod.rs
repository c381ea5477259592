mod measurement;

pub use measurement::{
    AnalysisResult, DetailEntry, GridCoord, SummaryEntry, ThermalMatrices, ThermalStats,
};
