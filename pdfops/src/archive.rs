//! Zip packaging of multi-document results.
//!
//! Entries are named `pdf_page_001.pdf`, `pdf_page_002.pdf`, … in input
//! order, deflate compressed, and stamped with the zip epoch
//! (1980-01-01 00:00) so identical inputs always yield identical archives.
//!
//! # Examples
//!
//! ```
//! use pdfops::archive::Archiver;
//!
//! let archive = Archiver::new()
//!     .package(&[b"%PDF-1.7 a".to_vec(), b"%PDF-1.7 b".to_vec()], None)
//!     .unwrap();
//! assert_eq!(archive.name, "pdf_split_results.zip");
//! assert_eq!(archive.entries, vec!["pdf_page_001.pdf", "pdf_page_002.pdf"]);
//! ```

use std::io::{Cursor, Write};

use tracing::{debug, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Result;

/// Archive name used when the caller does not supply one.
pub const DEFAULT_ARCHIVE_NAME: &str = "pdf_split_results.zip";

/// Prefix of every entry name.
pub const ENTRY_PREFIX: &str = "pdf_page_";

/// A finished zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Archive bytes.
    pub bytes: Vec<u8>,
    /// File name for the archive.
    pub name: String,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
}

/// Packages byte buffers into zip archives.
#[derive(Debug, Clone)]
pub struct Archiver {
    default_name: String,
}

impl Archiver {
    /// Create an archiver using [`DEFAULT_ARCHIVE_NAME`].
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_ARCHIVE_NAME)
    }

    /// Create an archiver with a different default archive name.
    pub fn with_default_name(name: impl Into<String>) -> Self {
        Self {
            default_name: name.into(),
        }
    }

    /// Name used when [`Archiver::package`] receives none.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Package `buffers` into one archive.
    ///
    /// # Arguments
    ///
    /// * `buffers` - Entry contents, in entry order
    /// * `name` - Archive name; the default name when `None` or blank
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    #[instrument(skip_all, fields(entries = buffers.len()))]
    pub fn package(&self, buffers: &[Vec<u8>], name: Option<&str>) -> Result<Archive> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = Vec::with_capacity(buffers.len());

        for (index, buffer) in buffers.iter().enumerate() {
            let entry = entry_name(index);
            writer.start_file(entry.as_str(), options)?;
            writer.write_all(buffer)?;
            entries.push(entry);
        }

        let bytes = writer.finish()?.into_inner();
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_name.as_str())
            .to_string();

        debug!(archive_bytes = bytes.len(), %name, "Archive written");

        Ok(Archive {
            bytes,
            name,
            entries,
        })
    }
}

impl Default for Archiver {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry name for the zero-based `index`.
pub fn entry_name(index: usize) -> String {
    format!("{ENTRY_PREFIX}{:03}.pdf", index + 1)
}
