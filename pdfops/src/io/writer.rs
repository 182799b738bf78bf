//! Document serialization.
//!
//! Output documents never touch the filesystem inside the library; they are
//! serialized to byte buffers and handed back to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::io::writer::{DocumentWriter, WriteOptions};
//! use lopdf::Document;
//!
//! # fn example(mut doc: Document) -> pdfops::Result<()> {
//! let writer = DocumentWriter::with_options(WriteOptions::compressed());
//! let bytes = writer.to_bytes(&mut doc)?;
//! println!("Wrote {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use tracing::debug;

use crate::error::{PdfOpsError, Result};

/// Options for serializing documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Flate-compress uncompressed streams before writing.
    pub compress: bool,

    /// Drop objects that are no longer reachable from the trailer.
    pub prune: bool,

    /// Renumber objects densely after pruning.
    pub renumber: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: false,
            prune: true,
            renumber: false,
        }
    }
}

impl WriteOptions {
    /// Options used by the compress operation.
    pub fn compressed() -> Self {
        Self {
            compress: true,
            prune: true,
            renumber: true,
        }
    }

    /// Write the document exactly as it is in memory.
    pub fn verbatim() -> Self {
        Self {
            compress: false,
            prune: false,
            renumber: false,
        }
    }
}

/// Serializes documents to in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    options: WriteOptions,
}

impl DocumentWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Options this writer applies.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serialize a document into a new buffer.
    ///
    /// The document is modified in place when pruning, compression or
    /// renumbering are enabled.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Serialization`] if the document cannot be
    /// written.
    pub fn to_bytes(&self, doc: &mut Document) -> Result<Vec<u8>> {
        if self.options.prune {
            let pruned = doc.prune_objects();
            if !pruned.is_empty() {
                debug!(pruned = pruned.len(), "Pruned unreachable objects");
            }
        }

        if self.options.compress {
            doc.compress();
        }

        if self.options.renumber {
            doc.renumber_objects();
        }

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|err| PdfOpsError::serialization(err.to_string()))?;

        debug!(output_bytes = output.len(), "Document serialized");
        Ok(output)
    }
}

/// Human-readable byte count, e.g. `1.50 MB`.
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if size < 1024 {
        return format!("{size} bytes");
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
