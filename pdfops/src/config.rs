//! Configuration module for pdfops.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working configuration. The CLI loads a file with
//! [`Config::from_file`] and then applies its own overrides.
//!
//! ```json
//! {
//!   "limits": { "max_file_size": 52428800, "max_pages_per_file": 500 },
//!   "preview_pages": 3,
//!   "data_dir": "/var/lib/pdfops"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::archive::DEFAULT_ARCHIVE_NAME;
use crate::engine::DEFAULT_PREVIEW_PAGES;
use crate::error::{PdfOpsError, Result};

/// Default upload size limit (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default page limit per document.
pub const DEFAULT_MAX_PAGES_PER_FILE: usize = 500;

/// Default number of files accepted by one merge.
pub const DEFAULT_MAX_FILES_PER_MERGE: usize = 20;

/// Default number of ratings kept on disk.
pub const DEFAULT_RATINGS_RETAINED: usize = 1000;

/// Default directory for service records.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Upload limits enforced before documents reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum upload size in bytes.
    pub max_file_size: u64,

    /// Maximum number of pages per document.
    pub max_pages_per_file: usize,

    /// Maximum number of files in one merge.
    pub max_files_per_merge: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_pages_per_file: DEFAULT_MAX_PAGES_PER_FILE,
            max_files_per_merge: DEFAULT_MAX_FILES_PER_MERGE,
        }
    }
}

/// Complete pdfops configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upload limits.
    pub limits: Limits,

    /// Number of pages rendered by a preview.
    pub preview_pages: usize,

    /// Default file name of split archives.
    pub archive_name: String,

    /// Directory holding statistics, ratings and contact records.
    pub data_dir: PathBuf,

    /// Number of ratings kept, newest first.
    pub ratings_retained: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            preview_pages: DEFAULT_PREVIEW_PAGES,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ratings_retained: DEFAULT_RATINGS_RETAINED,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Missing fields take their defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`Config::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            PdfOpsError::invalid_config(format!("{}: {err}", path.display()))
        })?;
        config.validate()?;

        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any limit is zero
    /// - The archive name is blank
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_size == 0 {
            return Err(PdfOpsError::invalid_config(
                "limits.max_file_size must be at least 1",
            ));
        }

        if self.limits.max_pages_per_file == 0 {
            return Err(PdfOpsError::invalid_config(
                "limits.max_pages_per_file must be at least 1",
            ));
        }

        if self.limits.max_files_per_merge == 0 {
            return Err(PdfOpsError::invalid_config(
                "limits.max_files_per_merge must be at least 1",
            ));
        }

        if self.archive_name.trim().is_empty() {
            return Err(PdfOpsError::invalid_config("archive_name cannot be empty"));
        }

        Ok(())
    }

    /// Path of a record file inside the data directory.
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
