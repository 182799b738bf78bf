//! Document loading with a repair fallback.
//!
//! Every input goes through the same two-tier parse:
//!
//! 1. a strict parse of the buffer as-is,
//! 2. if that fails, an explicit repair pass ([`crate::io::repair`]) followed
//!    by a second parse of the repaired buffer.
//!
//! Only when both fail is the input reported as malformed. The
//! [`LoadedDocument`] remembers which tier succeeded so callers can surface
//! it.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::io::reader::{DocumentLoader, LoadMode};
//!
//! # fn example(bytes: &[u8]) -> pdfops::Result<()> {
//! let loaded = DocumentLoader::new().load(bytes)?;
//! if loaded.mode == LoadMode::Repaired {
//!     println!("input needed repair");
//! }
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, ObjectId};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::error::{PdfOpsError, Result};
use crate::io::repair;

/// Which parse tier produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// The buffer parsed as-is.
    Strict,
    /// The buffer parsed only after the repair pass.
    Repaired,
}

/// A parsed document with its load metadata.
#[derive(Debug)]
pub struct LoadedDocument {
    /// The parsed document.
    pub document: Document,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Parse tier that succeeded.
    pub mode: LoadMode,

    /// Size of the input buffer in bytes.
    pub source_size: usize,

    /// Time taken to load the document.
    pub load_time: Duration,
}

impl LoadedDocument {
    fn new(document: Document, mode: LoadMode, source_size: usize, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();

        Self {
            document,
            page_count,
            mode,
            source_size,
            load_time,
        }
    }

    /// Page object ids in document order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    /// Whether the document only loaded after repair.
    pub fn was_repaired(&self) -> bool {
        self.mode == LoadMode::Repaired
    }
}

/// Loader implementing the strict-then-repair parse.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    /// Whether to attempt repair after a failed strict parse.
    repair: bool,
}

impl DocumentLoader {
    /// Create a loader with repair enabled.
    pub fn new() -> Self {
        Self { repair: true }
    }

    /// Create a loader that reports strict parse failures directly.
    pub fn strict_only() -> Self {
        Self { repair: false }
    }

    /// Load a document from an in-memory buffer.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw document bytes
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::MalformedDocument`] carrying both the strict and
    /// the repair failure when neither tier yields a document.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load(&self, bytes: &[u8]) -> Result<LoadedDocument> {
        let start = Instant::now();

        let strict_err = match Document::load_mem(bytes) {
            Ok(document) => {
                let loaded =
                    LoadedDocument::new(document, LoadMode::Strict, bytes.len(), start.elapsed());
                debug!(pages = loaded.page_count, "Document loaded");
                return Ok(loaded);
            }
            Err(err) => err.to_string(),
        };

        if !self.repair {
            return Err(PdfOpsError::malformed_document(strict_err, "repair disabled"));
        }

        debug!(error = %strict_err, "Strict parse failed, attempting repair");

        let Some(repaired) = repair::repair(bytes) else {
            warn!(error = %strict_err, "Document could not be repaired");
            return Err(PdfOpsError::malformed_document(
                strict_err,
                "no recoverable structure found",
            ));
        };

        match Document::load_mem(&repaired) {
            Ok(document) => {
                let loaded =
                    LoadedDocument::new(document, LoadMode::Repaired, bytes.len(), start.elapsed());
                warn!(pages = loaded.page_count, "Document loaded after repair");
                Ok(loaded)
            }
            Err(err) => {
                warn!(error = %strict_err, repair_error = %err, "Document could not be repaired");
                Err(PdfOpsError::malformed_document(strict_err, err.to_string()))
            }
        }
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
