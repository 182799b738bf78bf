//! Usage statistics: named counters with first and last use timestamps.
//!
//! Front ends call [`UsageStats::record_operation`] after every successful
//! operation. Recording never fails the caller; storage problems are logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use super::storage::Storage;
use crate::error::Result;

/// Counter bumped by every recorded operation.
pub const TOTAL_OPERATIONS: &str = "total_operations";

/// File name of the statistics record.
pub const STATS_FILE: &str = "stats.json";

/// An operation tracked by [`UsageStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Documents merged.
    Merge,
    /// Document split.
    Split,
    /// Pages rotated.
    Rotate,
    /// Document compressed.
    Compress,
    /// Preview rendered.
    Preview,
    /// Split results downloaded as an archive.
    ZipDownload,
}

impl Operation {
    /// Counter key of the operation.
    pub fn key(self) -> &'static str {
        match self {
            Self::Merge => "merges",
            Self::Split => "splits",
            Self::Rotate => "rotations",
            Self::Compress => "compressions",
            Self::Preview => "previews",
            Self::ZipDownload => "zip_downloads",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Persisted statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// When the first counter was bumped.
    pub first_use: Option<DateTime<Utc>>,

    /// When a counter was last bumped.
    pub last_use: Option<DateTime<Utc>>,

    /// Counter values by key.
    #[serde(flatten)]
    pub counters: BTreeMap<String, u64>,
}

impl StatsSnapshot {
    /// Value of a counter, zero if never bumped.
    pub fn get(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

/// Usage statistics service.
#[derive(Debug)]
pub struct UsageStats<S> {
    storage: S,
    guard: Mutex<()>,
}

impl<S: Storage<StatsSnapshot>> UsageStats<S> {
    /// Statistics kept in `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            guard: Mutex::new(()),
        }
    }

    /// Bump `key` by one. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be read or written.
    pub fn increment(&self, key: &str) -> Result<u64> {
        let snapshot = self.increment_all(&[key], Utc::now())?;
        Ok(snapshot.get(key))
    }

    /// Bump every key in `keys` by one in a single write, stamped `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be read or written.
    pub fn increment_all(&self, keys: &[&str], now: DateTime<Utc>) -> Result<StatsSnapshot> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut snapshot = self.storage.load()?.unwrap_or_default();

        for key in keys {
            let counter = snapshot.counters.entry((*key).to_string()).or_insert(0);
            *counter = counter.saturating_add(1);
        }
        snapshot.first_use.get_or_insert(now);
        snapshot.last_use = Some(now);

        self.storage.store(&snapshot)?;
        Ok(snapshot)
    }

    /// Current value of `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be read.
    pub fn get(&self, key: &str) -> Result<u64> {
        Ok(self.snapshot()?.get(key))
    }

    /// All counters and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be read.
    pub fn snapshot(&self) -> Result<StatsSnapshot> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.storage.load()?.unwrap_or_default())
    }

    /// Count one completed `operation`.
    pub fn record_operation(&self, operation: Operation) {
        match self.increment_all(&[operation.key(), TOTAL_OPERATIONS], Utc::now()) {
            Ok(snapshot) => debug!(
                %operation,
                count = snapshot.get(operation.key()),
                total = snapshot.get(TOTAL_OPERATIONS),
                "Operation recorded"
            ),
            Err(err) => warn!(%operation, %err, "Failed to record operation"),
        }
    }
}
