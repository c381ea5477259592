use std::path::Path;

use crate::models::AnalysisResult;

use super::{AnalysisError, Analyzer, TemperatureGrid, TEMPERATURE_FIELD};

/// Reads captures stored as HDF5 files with a 2D `temperature_matrix`
/// dataset at the root. Other datasets and attributes are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5GridAnalyzer;

impl Analyzer for Hdf5GridAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Option<AnalysisResult>, AnalysisError> {
        let hdf5_error = |source| AnalysisError::Hdf5 {
            path: path.to_path_buf(),
            source,
        };

        let file = hdf5::File::open(path).map_err(hdf5_error)?;
        if !file.link_exists(TEMPERATURE_FIELD) {
            return Ok(None);
        }

        let matrix = file
            .dataset(TEMPERATURE_FIELD)
            .and_then(|dataset| dataset.read_2d::<f64>())
            .map_err(hdf5_error)?;
        let rows = matrix.outer_iter().map(|row| row.to_vec()).collect();

        let grid = TemperatureGrid::from_rows(rows)?;
        Ok(Some(grid.analyze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridCoord;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_fixture(
        dir: &TempDir,
        name: &str,
        dataset: &str,
        shape: (usize, usize),
        cells: &[f64],
    ) -> PathBuf {
        let path = dir.path().join(name);
        let file = hdf5::File::create(&path).unwrap();
        let ds = file.new_dataset::<f64>().shape(shape).create(dataset).unwrap();
        ds.write_raw(cells).unwrap();
        path
    }

    #[test]
    fn test_analyzes_temperature_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "thermal_data_20240101_080000.h5",
            TEMPERATURE_FIELD,
            (2, 3),
            &[20.0, 21.5, 22.0, 35.0, 19.0, 23.0],
        );

        let result = Hdf5GridAnalyzer.analyze(&path).unwrap().unwrap();

        assert_eq!(result.stats.max, 35.0);
        assert_eq!(result.stats.min, 19.0);
        assert_eq!(result.stats.hot_spot_coords, GridCoord(1, 0));
        assert_eq!(result.stats.cold_spot_coords, GridCoord(1, 1));
        assert_eq!(
            result.matrices.temperature,
            vec![vec![20.0, 21.5, 22.0], vec![35.0, 19.0, 23.0]]
        );
        assert_eq!(result.matrices.hot_roi, vec![vec![0, 0, 0], vec![1, 0, 0]]);
    }

    #[test]
    fn test_missing_dataset_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "capture.h5",
            "humidity_matrix",
            (2, 2),
            &[1.0, 2.0, 3.0, 4.0],
        );

        assert!(Hdf5GridAnalyzer.analyze(&path).unwrap().is_none());
    }

    #[test]
    fn test_non_hdf5_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_really.h5");
        std::fs::write(&path, r#"{"temperature_matrix": [[1, 2], [3, 4]]}"#).unwrap();

        assert!(matches!(
            Hdf5GridAnalyzer.analyze(&path),
            Err(AnalysisError::Hdf5 { .. })
        ));
    }
}
