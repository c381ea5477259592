use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::Analyzer, cache::IngestionCache, metrics::IngestMetrics, settings::Settings,
};

use super::loop_worker::{ingest_loop, ScanJob, ScanState};

/// Owns the background ingest task. The cache and metrics it writes to are
/// handed in, so query code can hold its own clones of them.
pub struct IngestController {
    cache: IngestionCache,
    metrics: IngestMetrics,
    analyzer: Arc<dyn Analyzer>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    state_rx: Option<watch::Receiver<ScanState>>,
}

impl IngestController {
    pub fn new(cache: IngestionCache, metrics: IngestMetrics, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            cache,
            metrics,
            analyzer,
            handle: None,
            cancel_token: None,
            state_rx: None,
        }
    }

    /// Spawns the polling loop. Must be called from within a tokio runtime.
    pub fn start(&mut self, settings: &Settings) -> Result<()> {
        if self.handle.is_some() {
            bail!("ingestion already running");
        }

        let cancel_token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(ScanState::Idle);

        let job = ScanJob {
            data_dir: settings.data_dir.clone(),
            extension: settings.extension.clone(),
            cache: self.cache.clone(),
            analyzer: Arc::clone(&self.analyzer),
        };

        let handle = tokio::spawn(ingest_loop(
            job,
            settings.poll_interval(),
            self.metrics.clone(),
            state_tx,
            cancel_token.clone(),
        ));

        info!("Ingestion started for {}", settings.data_dir.display());
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.state_rx = Some(state_rx);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn scan_state(&self) -> ScanState {
        self.state_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(ScanState::Idle)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.state_rx = None;

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("ingest loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
