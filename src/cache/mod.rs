use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{AnalysisResult, DetailEntry, SummaryEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("dataset {index} not found (cache holds {len} datasets)")]
    NotFound { index: usize, len: usize },
}

/// An analyzed file waiting to be merged into the cache.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub filename: String,
    pub timestamp: NaiveDateTime,
    pub result: AnalysisResult,
}

/// Summary and detail for the same file travel together, so the two views
/// can never drift out of alignment.
struct CacheEntry {
    summary: SummaryEntry,
    detail: Arc<DetailEntry>,
}

#[derive(Default)]
struct CacheState {
    /// Sorted ascending by timestamp after every non-empty commit.
    entries: Vec<CacheEntry>,
    processed: HashSet<String>,
}

/// Process-lifetime store of analyzed captures.
///
/// Every operation takes the same lock, so readers observe the cache either
/// entirely before or entirely after a commit. Cloning shares the store.
#[derive(Clone, Default)]
pub struct IngestionCache {
    inner: Arc<Mutex<CacheState>>,
}

impl IngestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn snapshot_summary(&self) -> Vec<SummaryEntry> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.summary.clone())
            .collect()
    }

    pub fn snapshot_detail(&self, index: usize) -> Result<Arc<DetailEntry>, CacheError> {
        let state = self.lock();
        state
            .entries
            .get(index)
            .map(|entry| Arc::clone(&entry.detail))
            .ok_or(CacheError::NotFound {
                index,
                len: state.entries.len(),
            })
    }

    /// Appends every entry whose filename has not been processed yet, then
    /// re-sorts the whole cache by timestamp. Returns how many were appended.
    ///
    /// The sort is stable: entries sharing a timestamp keep their insertion
    /// order. An empty batch leaves the cache untouched.
    pub fn commit(&self, batch: Vec<PendingEntry>) -> usize {
        if batch.is_empty() {
            return 0;
        }

        let mut state = self.lock();
        let mut appended = 0;
        for pending in batch {
            if state.processed.contains(&pending.filename) {
                continue;
            }
            state.processed.insert(pending.filename.clone());
            state.entries.push(CacheEntry {
                summary: SummaryEntry::from_analysis(pending.timestamp, &pending.result),
                detail: Arc::new(DetailEntry::new(pending.filename, pending.result)),
            });
            appended += 1;
        }

        state
            .entries
            .sort_by(|a, b| a.summary.timestamp.cmp(&b.summary.timestamp));
        appended
    }

    /// Filters `listed` down to names not yet processed, preserving order.
    pub fn unprocessed(&self, listed: Vec<String>) -> Vec<String> {
        let state = self.lock();
        listed
            .into_iter()
            .filter(|name| !state.processed.contains(name))
            .collect()
    }

    pub fn is_processed(&self, filename: &str) -> bool {
        self.lock().processed.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
