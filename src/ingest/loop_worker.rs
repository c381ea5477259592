use std::{path::PathBuf, sync::Arc};

use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{analysis::Analyzer, cache::IngestionCache, metrics::IngestMetrics};

use super::scan::scan_once;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

/// Everything one pass needs, owned so it can move onto a blocking thread.
#[derive(Clone)]
pub struct ScanJob {
    pub data_dir: PathBuf,
    pub extension: String,
    pub cache: IngestionCache,
    pub analyzer: Arc<dyn Analyzer>,
}

pub async fn ingest_loop(
    job: ScanJob,
    poll_interval: Duration,
    metrics: IngestMetrics,
    state_tx: watch::Sender<ScanState>,
    cancel_token: CancellationToken,
) {
    log_info!(
        "ingest loop watching {} every {}s",
        job.data_dir.display(),
        poll_interval.as_secs()
    );

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let _ = state_tx.send(ScanState::Scanning);

                let pass = tokio::task::spawn_blocking({
                    let job = job.clone();
                    move || scan_once(&job.data_dir, &job.extension, &job.cache, job.analyzer.as_ref())
                });

                // Shutdown does not wait for an in-flight pass; the blocking
                // task finishes or dies with the process.
                let outcome = tokio::select! {
                    joined = pass => joined,
                    _ = cancel_token.cancelled() => break,
                };

                match outcome {
                    Ok(pass) => metrics.record_pass(pass).await,
                    Err(err) => log_error!("scan pass worker failed: {err}"),
                }

                let _ = state_tx.send(ScanState::Idle);
                // Full interval of idle time after each pass, however long it took.
                ticker.reset();
            }
            _ = cancel_token.cancelled() => break,
        }
    }

    let _ = state_tx.send(ScanState::Idle);
    log_info!("ingest loop shutting down");
}
