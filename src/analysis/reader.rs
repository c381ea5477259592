use std::{fs, path::Path};

use serde::Deserialize;

use crate::models::AnalysisResult;

use super::{AnalysisError, Analyzer, TemperatureGrid};

/// Name of the field holding the temperature grid in a measurement document.
pub const TEMPERATURE_FIELD: &str = "temperature_matrix";

#[derive(Debug, Deserialize)]
struct MeasurementDocument {
    #[serde(default)]
    temperature_matrix: Option<Vec<Vec<f64>>>,
}

/// Reads measurement files stored as JSON documents with a
/// `temperature_matrix` array of rows. Any other fields are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGridAnalyzer;

impl Analyzer for JsonGridAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Option<AnalysisResult>, AnalysisError> {
        let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: MeasurementDocument =
            serde_json::from_slice(&bytes).map_err(|source| AnalysisError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let Some(rows) = document.temperature_matrix else {
            return Ok(None);
        };

        let grid = TemperatureGrid::from_rows(rows)?;
        Ok(Some(grid.analyze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridCoord;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_analyzes_valid_document() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "thermal_data_20240101_080000.json",
            r#"{"sensor": "cam-1", "temperature_matrix": [[20, 21.5], [35, 19]]}"#,
        );

        let result = JsonGridAnalyzer.analyze(&path).unwrap().unwrap();

        assert_eq!(result.stats.max, 35.0);
        assert_eq!(result.stats.min, 19.0);
        assert_eq!(result.stats.hot_spot_coords, GridCoord(1, 0));
        assert_eq!(result.stats.cold_spot_coords, GridCoord(1, 1));
        assert_eq!(result.matrices.hot_roi, vec![vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn test_missing_temperature_field_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "capture.json", r#"{"humidity_matrix": [[1, 2], [3, 4]]}"#);

        assert!(JsonGridAnalyzer.analyze(&path).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_and_invalid_files_are_errors() {
        let dir = TempDir::new().unwrap();
        let garbage = write(&dir, "garbage.json", "not json at all");

        assert!(matches!(
            JsonGridAnalyzer.analyze(&garbage),
            Err(AnalysisError::Decode { .. })
        ));
        assert!(matches!(
            JsonGridAnalyzer.analyze(&dir.path().join("vanished.json")),
            Err(AnalysisError::Io { .. })
        ));
    }

    #[test]
    fn test_ragged_grid_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ragged.json", r#"{"temperature_matrix": [[1, 2], [3]]}"#);

        assert!(matches!(
            JsonGridAnalyzer.analyze(&path),
            Err(AnalysisError::Ragged { .. })
        ));
    }
}
