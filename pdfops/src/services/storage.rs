//! Persistence backends for service records.
//!
//! A [`Storage`] holds exactly one value. [`RecordLog`] layers an
//! append-only list with a seen flag on top of it.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::error::{PdfOpsError, Result};

/// A backend that loads and stores a single value.
pub trait Storage<T>: Send + Sync {
    /// Load the stored value, or `None` if nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value exists but cannot be read.
    fn load(&self) -> Result<Option<T>>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn store(&self, value: &T) -> Result<()>;
}

/// Pretty-printed JSON file storage.
///
/// Writes go to a temporary sibling first and are renamed over the target,
/// so readers never observe a half-written file.
#[derive(Debug)]
pub struct JsonFileStorage<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStorage<T> {
    /// Storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> Storage<T> for JsonFileStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PdfOpsError::storage(&self.path, err.to_string())),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| PdfOpsError::storage(&self.path, err.to_string()))
    }

    fn store(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| PdfOpsError::storage(parent, err.to_string()))?;
        }

        let json = serde_json::to_string_pretty(value)
            .map_err(|err| PdfOpsError::storage(&self.path, err.to_string()))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, json)
            .map_err(|err| PdfOpsError::storage(&temp_path, err.to_string()))?;
        fs::rename(&temp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            PdfOpsError::storage(&self.path, err.to_string())
        })?;

        debug!(path = %self.path.display(), "Stored");
        Ok(())
    }
}

/// In-memory storage, for tests and ephemeral use.
#[derive(Debug)]
pub struct MemoryStorage<T> {
    value: Mutex<Option<T>>,
}

impl<T> MemoryStorage<T> {
    /// Empty storage.
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    /// Storage pre-filled with `value`.
    pub fn with_value(value: T) -> Self {
        Self {
            value: Mutex::new(Some(value)),
        }
    }
}

impl<T> Default for MemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> Storage<T> for MemoryStorage<T> {
    fn load(&self) -> Result<Option<T>> {
        Ok(lock(&self.value).clone())
    }

    fn store(&self, value: &T) -> Result<()> {
        *lock(&self.value) = Some(value.clone());
        Ok(())
    }
}

/// A persisted record with an identity and a seen flag.
pub trait Record: Clone {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Whether an administrator has seen the record.
    fn is_seen(&self) -> bool;

    /// Flag the record as seen.
    fn mark_seen(&mut self);
}

/// Append-only list of records kept in one [`Storage`].
///
/// Every mutation is a read-modify-write under one lock.
#[derive(Debug)]
pub struct RecordLog<R, S> {
    storage: S,
    guard: Mutex<()>,
    retain: Option<usize>,
    _marker: PhantomData<fn() -> R>,
}

impl<R, S> RecordLog<R, S>
where
    R: Record,
    S: Storage<Vec<R>>,
{
    /// Log without a retention cap.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            guard: Mutex::new(()),
            retain: None,
            _marker: PhantomData,
        }
    }

    /// Keep only the newest `limit` records after every append.
    pub fn with_retention(mut self, limit: usize) -> Self {
        self.retain = Some(limit);
        self
    }

    /// All records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn read_all(&self) -> Result<Vec<R>> {
        let _guard = lock(&self.guard);
        Ok(self.storage.load()?.unwrap_or_default())
    }

    /// Apply `f` to the records and store the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn update<T>(&self, f: impl FnOnce(&mut Vec<R>) -> T) -> Result<T> {
        let _guard = lock(&self.guard);
        let mut records = self.storage.load()?.unwrap_or_default();
        let result = f(&mut records);

        if let Some(limit) = self.retain
            && records.len() > limit
        {
            let excess = records.len() - limit;
            records.drain(..excess);
        }

        self.storage.store(&records)?;
        Ok(result)
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// See [`RecordLog::update`].
    pub fn append(&self, record: R) -> Result<()> {
        self.update(|records| records.push(record))
    }

    /// Flag every record as seen. Returns how many were unseen.
    ///
    /// # Errors
    ///
    /// See [`RecordLog::update`].
    pub fn mark_all_seen(&self) -> Result<usize> {
        self.update(|records| {
            let mut marked = 0;
            for record in records.iter_mut().filter(|record| !record.is_seen()) {
                record.mark_seen();
                marked += 1;
            }
            marked
        })
    }

    /// Number of records not yet seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn unseen_count(&self) -> Result<usize> {
        Ok(self.read_all()?.iter().filter(|r| !r.is_seen()).count())
    }

    /// Remove the record with `id`, returning it.
    ///
    /// # Errors
    ///
    /// See [`RecordLog::update`].
    pub fn remove(&self, id: &str) -> Result<Option<R>> {
        self.update(|records| {
            let index = records.iter().position(|record| record.id() == id)?;
            Some(records.remove(index))
        })
    }
}

/// Make `base` unique among `records` by appending a counter.
pub(crate) fn unique_id<R: Record>(base: String, records: &[R]) -> String {
    let taken = |id: &str| records.iter().any(|record| record.id() == id);
    if !taken(&base) {
        return base;
    }

    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
