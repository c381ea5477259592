use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one scan pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassMetrics {
    pub started_at: DateTime<Utc>,
    pub listed: usize,
    pub new_files: usize,
    pub committed: usize,
    /// Files without a temperature grid. They are retried next pass.
    pub skipped: usize,
    pub directory_missing: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl PassMetrics {
    pub fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ..Self::default()
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub system: SystemMetrics,
    pub recent_passes: Vec<PassMetrics>,
    pub pass_count: u64,
    pub committed_count: u64,
    pub skipped_count: u64,
    pub failed_pass_count: u64,
}
