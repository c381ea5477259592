use crate::models::{AnalysisResult, GridCoord, ThermalMatrices, ThermalStats};

use super::AnalysisError;

/// Cells strictly above `min + ROI_FRACTION * (max - min)` are flagged hot.
pub const ROI_FRACTION: f64 = 0.95;

/// Rectangular row-major temperature grid with at least two rows and two
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl TemperatureGrid {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        let row_count = rows.len();
        let col_count = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return Err(AnalysisError::Empty);
        }

        let mut cells = Vec::with_capacity(row_count * col_count);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != col_count {
                return Err(AnalysisError::Ragged {
                    row: index,
                    expected: col_count,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        // A one-sided difference needs two samples along each axis.
        if row_count < 2 || col_count < 2 {
            return Err(AnalysisError::TooSmall {
                rows: row_count,
                cols: col_count,
            });
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            cells,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    pub fn min(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.cells.iter().sum::<f64>() / self.cells.len() as f64
    }

    /// First cell (row-major) holding the maximum.
    pub fn hot_spot(&self) -> GridCoord {
        self.first_extreme(|candidate, best| candidate > best)
    }

    /// First cell (row-major) holding the minimum.
    pub fn cold_spot(&self) -> GridCoord {
        self.first_extreme(|candidate, best| candidate < best)
    }

    fn first_extreme(&self, better: impl Fn(f64, f64) -> bool) -> GridCoord {
        let mut best_index = 0;
        for (index, &value) in self.cells.iter().enumerate().skip(1) {
            if better(value, self.cells[best_index]) {
                best_index = index;
            }
        }
        GridCoord(best_index / self.cols, best_index % self.cols)
    }

    /// Per-axis derivatives `(d/drow, d/dcol)` with unit spacing: central
    /// differences inside, one-sided differences on the edges.
    pub fn gradient(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let mut grad_rows = vec![vec![0.0; self.cols]; self.rows];
        let mut grad_cols = vec![vec![0.0; self.cols]; self.rows];

        for row in 0..self.rows {
            for col in 0..self.cols {
                grad_rows[row][col] = axis_difference(self.rows, row, |i| self.get(i, col));
                grad_cols[row][col] = axis_difference(self.cols, col, |j| self.get(row, j));
            }
        }

        (grad_rows, grad_cols)
    }

    pub fn gradient_magnitude(&self) -> Vec<Vec<f64>> {
        let (grad_rows, grad_cols) = self.gradient();
        grad_rows
            .iter()
            .zip(&grad_cols)
            .map(|(gy, gx)| {
                gy.iter()
                    .zip(gx)
                    .map(|(dy, dx)| (dy * dy + dx * dx).sqrt())
                    .collect()
            })
            .collect()
    }

    pub fn hot_roi(&self) -> Vec<Vec<u8>> {
        let min = self.min();
        let threshold = min + ROI_FRACTION * (self.max() - min);
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|&t| u8::from(t > threshold)).collect())
            .collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    pub fn analyze(&self) -> AnalysisResult {
        AnalysisResult {
            stats: ThermalStats {
                min: self.min(),
                max: self.max(),
                avg: self.mean(),
                hot_spot_coords: self.hot_spot(),
                cold_spot_coords: self.cold_spot(),
            },
            matrices: ThermalMatrices {
                temperature: self.to_rows(),
                gradient_magnitude: self.gradient_magnitude(),
                hot_roi: self.hot_roi(),
            },
        }
    }
}

fn axis_difference(len: usize, i: usize, value: impl Fn(usize) -> f64) -> f64 {
    if i == 0 {
        value(1) - value(0)
    } else if i == len - 1 {
        value(len - 1) - value(len - 2)
    } else {
        (value(i + 1) - value(i - 1)) / 2.0
    }
}
