mod types;

pub use types::{MetricsSnapshot, PassMetrics, SystemMetrics};

use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

const MAX_RECENT_PASSES: usize = 20;

/// Running tally of scan passes, shared between the ingest loop and queries.
pub struct IngestMetrics {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    recent_passes: Vec<PassMetrics>,
    pass_count: u64,
    committed_count: u64,
    skipped_count: u64,
    failed_pass_count: u64,
    system: System,
    pid: Pid,
}

impl IngestMetrics {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // Baseline refresh so the first CPU reading has a delta to work from
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                recent_passes: Vec::with_capacity(MAX_RECENT_PASSES),
                pass_count: 0,
                committed_count: 0,
                skipped_count: 0,
                failed_pass_count: 0,
                system,
                pid,
            })),
        }
    }

    pub async fn record_pass(&self, pass: PassMetrics) {
        let mut state = self.inner.lock().await;

        state.pass_count += 1;
        state.committed_count += pass.committed as u64;
        state.skipped_count += pass.skipped as u64;
        if pass.failed() {
            state.failed_pass_count += 1;
        }

        state.recent_passes.push(pass);
        if state.recent_passes.len() > MAX_RECENT_PASSES {
            state.recent_passes.remove(0);
        }
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        let system = state
            .system
            .process(pid)
            .map(|process| SystemMetrics {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            })
            .unwrap_or_default();

        MetricsSnapshot {
            system,
            recent_passes: state.recent_passes.clone(),
            pass_count: state.pass_count,
            committed_count: state.committed_count,
            skipped_count: state.skipped_count,
            failed_pass_count: state.failed_pass_count,
        }
    }
}

impl Default for IngestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for IngestMetrics {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pass(committed: usize, skipped: usize, error: Option<&str>) -> PassMetrics {
        PassMetrics {
            committed,
            skipped,
            error: error.map(String::from),
            ..PassMetrics::started(Utc::now())
        }
    }

    #[tokio::test]
    async fn test_record_pass_accumulates_counters() {
        let metrics = IngestMetrics::new();
        metrics.record_pass(pass(3, 1, None)).await;
        metrics.record_pass(pass(0, 1, Some("boom"))).await;

        let snapshot = metrics.get_snapshot().await;
        assert_eq!(snapshot.pass_count, 2);
        assert_eq!(snapshot.committed_count, 3);
        assert_eq!(snapshot.skipped_count, 2);
        assert_eq!(snapshot.failed_pass_count, 1);
        assert_eq!(snapshot.recent_passes.len(), 2);
    }

    #[tokio::test]
    async fn test_recent_passes_are_bounded() {
        let metrics = IngestMetrics::new();
        for committed in 0..(MAX_RECENT_PASSES + 5) {
            metrics.record_pass(pass(committed, 0, None)).await;
        }

        let snapshot = metrics.get_snapshot().await;
        assert_eq!(snapshot.recent_passes.len(), MAX_RECENT_PASSES);
        assert_eq!(snapshot.recent_passes[0].committed, 5);
        assert_eq!(snapshot.pass_count, (MAX_RECENT_PASSES + 5) as u64);
    }
}
