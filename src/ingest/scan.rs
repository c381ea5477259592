use anyhow::{Context, Result};
use chrono::Utc;
use std::{fs, io, path::Path, time::Instant};

use crate::{
    analysis::{Analyzer, TEMPERATURE_FIELD},
    cache::{IngestionCache, PendingEntry},
    metrics::PassMetrics,
    timestamp::extract_timestamp,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Names of regular files in `dir` ending in `.{extension}`, sorted
/// lexicographically. `Ok(None)` when the directory does not exist.
pub fn list_measurement_files(dir: &Path, extension: &str) -> Result<Option<Vec<String>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to list {}", dir.display()))
        }
    };

    let suffix = format!(".{extension}");
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.ends_with(&suffix) {
            continue;
        }
        // Follows symlinks; a dangling link is not a capture.
        let is_file = fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file {
            names.push(name);
        }
    }

    names.sort();
    Ok(Some(names))
}

/// Runs one discovery pass: list, diff against the cache, analyze new files
/// in name order, then merge everything analyzed under a single lock.
///
/// The cache lock is held only while diffing and while merging, never while
/// a file is read. An analysis error stops the pass; files analyzed before it
/// are still merged and the rest are picked up next pass.
pub fn scan_once(
    dir: &Path,
    extension: &str,
    cache: &IngestionCache,
    analyzer: &dyn Analyzer,
) -> PassMetrics {
    let started = Instant::now();
    let mut pass = PassMetrics::started(Utc::now());

    let listed = match list_measurement_files(dir, extension) {
        Ok(Some(listed)) => listed,
        Ok(None) => {
            log_warn!("data directory {} does not exist, skipping pass", dir.display());
            pass.directory_missing = true;
            pass.duration_ms = started.elapsed().as_millis() as u64;
            return pass;
        }
        Err(err) => {
            log_error!("scan pass aborted: {err:#}");
            pass.error = Some(format!("{err:#}"));
            pass.duration_ms = started.elapsed().as_millis() as u64;
            return pass;
        }
    };
    pass.listed = listed.len();

    let new_files = cache.unprocessed(listed);
    pass.new_files = new_files.len();
    if new_files.is_empty() {
        log_debug!("no new measurement files in {}", dir.display());
        pass.duration_ms = started.elapsed().as_millis() as u64;
        return pass;
    }
    log_info!("new measurement files detected: {:?}", new_files);

    let mut batch = Vec::with_capacity(new_files.len());
    for filename in new_files {
        let path = dir.join(&filename);
        match analyzer.analyze(&path) {
            Ok(Some(result)) => {
                let timestamp = extract_timestamp(&filename);
                batch.push(PendingEntry {
                    filename,
                    timestamp,
                    result,
                });
            }
            Ok(None) => {
                log_warn!("{filename} has no {TEMPERATURE_FIELD}, skipping");
                pass.skipped += 1;
            }
            Err(err) => {
                log_error!("scan pass aborted at {filename}: {err}");
                pass.error = Some(format!("{filename}: {err}"));
                break;
            }
        }
    }

    pass.committed = cache.commit(batch);
    pass.duration_ms = started.elapsed().as_millis() as u64;
    log_info!(
        "scan pass finished in {}ms: listed={} new={} committed={} skipped={}",
        pass.duration_ms,
        pass.listed,
        pass.new_files,
        pass.committed,
        pass.skipped
    );
    pass
}
