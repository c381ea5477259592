use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::{
    cache::CacheError,
    metrics::MetricsSnapshot,
    models::{DetailEntry, SummaryEntry},
    AppState,
};

const NOT_FOUND_STATUS: u16 = 404;

/// Failures a client can see. Serializes as
/// `{"error": "not_found", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum QueryError {
    #[error("{message}")]
    NotFound { message: String },
}

impl QueryError {
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::NotFound { .. } => NOT_FOUND_STATUS,
        }
    }
}

impl From<CacheError> for QueryError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::NotFound { index, len } => QueryError::NotFound {
                message: format!("Dataset {index} not found (cache holds {len} datasets)"),
            },
        }
    }
}

/// Time series for the chart, oldest first.
pub fn get_summary(state: &AppState) -> Vec<SummaryEntry> {
    state.cache.snapshot_summary()
}

pub fn get_detail(state: &AppState, index: usize) -> Result<Arc<DetailEntry>, QueryError> {
    state.cache.snapshot_detail(index).map_err(|err| {
        log::debug!("detail lookup missed: {err}");
        QueryError::from(err)
    })
}

pub async fn get_ingest_metrics(state: &AppState) -> MetricsSnapshot {
    state.metrics.get_snapshot().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PendingEntry;
    use crate::models::{AnalysisResult, GridCoord, ThermalMatrices, ThermalStats};
    use chrono::NaiveDate;
    use serde_json::json;

    fn state_with(names: &[(&str, u32)]) -> AppState {
        let state = AppState::new();
        let batch = names
            .iter()
            .map(|(name, hour)| PendingEntry {
                filename: name.to_string(),
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.and_hms_opt(*hour, 0, 0))
                    .unwrap(),
                result: AnalysisResult {
                    stats: ThermalStats {
                        min: 1.0,
                        max: f64::from(*hour),
                        avg: 2.0,
                        hot_spot_coords: GridCoord(0, 1),
                        cold_spot_coords: GridCoord(1, 0),
                    },
                    matrices: ThermalMatrices {
                        temperature: vec![vec![1.0, 3.0], vec![1.0, 2.0]],
                        gradient_magnitude: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
                        hot_roi: vec![vec![0, 1], vec![0, 0]],
                    },
                },
            })
            .collect();
        state.cache.commit(batch);
        state
    }

    #[test]
    fn test_summary_json_shape() {
        let state = state_with(&[("cam_a_20240101_090000.json", 9), ("cam_a_20240101_080000.json", 8)]);

        let value = serde_json::to_value(get_summary(&state)).unwrap();
        assert_eq!(
            value,
            json!([
                {"timestamp": "2024-01-01T08:00:00", "max_temp": 8.0, "min_temp": 1.0},
                {"timestamp": "2024-01-01T09:00:00", "max_temp": 9.0, "min_temp": 1.0},
            ])
        );
    }

    #[test]
    fn test_detail_matches_sorted_position() {
        let state = state_with(&[("late", 9), ("early", 8)]);

        assert_eq!(get_detail(&state, 0).unwrap().filename, "early");
        assert_eq!(get_detail(&state, 1).unwrap().filename, "late");
    }

    #[test]
    fn test_detail_out_of_range_is_not_found() {
        let state = state_with(&[("only", 8)]);

        let err = get_detail(&state, 1).unwrap_err();
        assert_eq!(err.status_code(), 404);

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["error"], "not_found");
        assert_eq!(
            value["message"],
            "Dataset 1 not found (cache holds 1 datasets)"
        );
    }

    #[tokio::test]
    async fn test_metrics_start_empty() {
        let state = AppState::new();
        let snapshot = get_ingest_metrics(&state).await;
        assert_eq!(snapshot.pass_count, 0);
        assert!(snapshot.recent_passes.is_empty());
    }
}
