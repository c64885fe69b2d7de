//! Dataset cache
//!
//! Load-once reuse-across-renders storage for the prepared table, keyed by
//! source path identity and invalidated by file modification time. The
//! cached rows are immutable; a reload swaps in a fresh generation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::data;
use crate::error::DashboardError;
use crate::records::{self, SalesRecord};

struct CacheEntry {
    modified: SystemTime,
    records: Arc<Vec<SalesRecord>>,
}

/// Process-wide cache for one sales data source.
pub struct DatasetCache {
    path: PathBuf,
    entry: RwLock<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            entry: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached table, reloading when the source file's modification
    /// time has changed since the cached generation was built.
    ///
    /// A failed reload propagates the error and leaves no partial entry.
    pub fn get(&self) -> Result<Arc<Vec<SalesRecord>>, DashboardError> {
        let modified = self.source_mtime()?;

        {
            let guard = self.entry.read().expect("dataset cache lock poisoned");
            if let Some(entry) = guard.as_ref() {
                if entry.modified == modified {
                    return Ok(Arc::clone(&entry.records));
                }
            }
        }

        let mut guard = self.entry.write().expect("dataset cache lock poisoned");
        // Another caller may have reloaded while we waited for the lock.
        if let Some(entry) = guard.as_ref() {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.records));
            }
        }

        let df = data::load_and_normalize(&self.path)?;
        let records = Arc::new(records::extract_records(&df)?);
        *guard = Some(CacheEntry {
            modified,
            records: Arc::clone(&records),
        });

        Ok(records)
    }

    /// Drop the cached generation; the next [`get`](Self::get) reloads.
    pub fn invalidate(&self) {
        let mut guard = self.entry.write().expect("dataset cache lock poisoned");
        *guard = None;
    }

    /// Token identifying the cached generation, derived from the source
    /// file's modification time. Zero before the first successful load.
    pub fn version(&self) -> u64 {
        let guard = self.entry.read().expect("dataset cache lock poisoned");
        guard
            .as_ref()
            .and_then(|entry| entry.modified.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn source_mtime(&self) -> Result<SystemTime, DashboardError> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "'{}' not found or unreadable: {}",
                self.path.display(),
                e
            ))
        })?;
        metadata.modified().map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "'{}' has no readable modification time: {}",
                self.path.display(),
                e
            ))
        })
    }
}
