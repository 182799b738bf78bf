//! Document operation engine.
//!
//! The engine applies one operation per call to documents held entirely in
//! memory. It keeps no state between calls: every input buffer is parsed
//! into a private document, transformed, serialized, and dropped.
//!
//! Operations:
//!
//! - [`Engine::merge`] concatenates documents in input order
//! - [`Engine::split`] produces one or more documents from page subsets
//! - [`Engine::rotate`] rotates selected pages and keeps every page
//! - [`Engine::compress`] rebuilds a document with compressed streams
//! - [`Engine::preview`] encodes the first pages as single-page documents
//! - [`Engine::archive`] packages several outputs into one zip archive
//!
//! Inputs that fail to parse go through a repair pass before the operation
//! gives up (see [`crate::io::reader`]). Failures on individual pages do not
//! abort an operation; they are reported as [`PageIssue`]s on the output.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::engine::Engine;
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfops::Result<()> {
//! let engine = Engine::new();
//! let merged = engine.merge(&[a, b])?;
//! println!("{} pages", merged.page_count);
//!
//! let rotated = engine.rotate(&merged.bytes, 90, "1-2")?;
//! println!("rotated {} of {} pages", rotated.rotated_count, rotated.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod merge;
pub mod pages;
pub mod preview;
pub mod rotate;
pub mod split;

pub use pages::{PageCopier, PageRotator, RotateEntry, RotationError};
pub use split::SplitMode;

use serde::Serialize;
use std::fmt;

use crate::archive::{Archive, Archiver};
use crate::config::Config;
use crate::error::Result;
use crate::io::{DocumentLoader, LoadedDocument};

/// Number of pages rendered by [`Engine::preview`] unless configured.
pub const DEFAULT_PREVIEW_PAGES: usize = 3;

/// A page that could not be processed while the operation carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIssue {
    /// 1-based ordinal of the input document the page belongs to.
    pub input: usize,
    /// 1-based page number within that input.
    pub page: usize,
    /// What went wrong.
    pub reason: String,
}

impl PageIssue {
    pub(crate) fn new(input: usize, page: usize, reason: impl Into<String>) -> Self {
        Self {
            input,
            page,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input {} page {}: {}", self.input, self.page, self.reason)
    }
}

/// Result of [`Engine::merge`].
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// Serialized merged document.
    pub bytes: Vec<u8>,
    /// Number of pages in the merged document.
    pub page_count: usize,
    /// Number of inputs that only loaded after repair.
    pub repaired_inputs: usize,
    /// Pages that could not be copied.
    pub skipped: Vec<PageIssue>,
}

/// Result of [`Engine::split`].
#[derive(Debug, Clone, Default)]
pub struct SplitOutput {
    /// Serialized output documents, in production order.
    pub documents: Vec<Vec<u8>>,
    /// Selector fragments that produced no output.
    pub ignored_fragments: Vec<String>,
    /// Pages that could not be copied.
    pub skipped: Vec<PageIssue>,
}

impl SplitOutput {
    /// Number of output documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was produced.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of [`Engine::rotate`].
#[derive(Debug, Clone)]
pub struct RotateOutput {
    /// Serialized document with every source page.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub total_pages: usize,
    /// Number of selected pages that were processed.
    pub rotated_count: usize,
    /// Whether the selector could not be parsed and every page was rotated.
    pub selection_fallback: bool,
    /// Selected pages left unrotated.
    pub skipped: Vec<PageIssue>,
}

/// Result of [`Engine::compress`].
#[derive(Debug, Clone)]
pub struct CompressOutput {
    /// Serialized compressed document.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Size of the input buffer.
    pub input_size: usize,
    /// Size of the output buffer.
    pub output_size: usize,
    /// Pages whose content streams were copied unmodified.
    pub uncompressed_pages: usize,
    /// Pages that could not be copied or compressed.
    pub skipped: Vec<PageIssue>,
}

impl CompressOutput {
    /// Output size relative to input size; `1.0` for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 1.0;
        }
        self.output_size as f64 / self.input_size as f64
    }
}

/// Result of [`Engine::preview`].
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutput {
    /// Base64 encoded single-page documents, from page 1 onwards.
    pub previews: Vec<String>,
    /// Number of pages in the source document.
    pub total_pages: usize,
    /// Pages that could not be rendered into a preview.
    pub skipped: Vec<PageIssue>,
}

/// Stateless document operation engine.
///
/// The rotation backend is a type parameter so it is chosen at compile time.
#[derive(Debug, Clone)]
pub struct Engine<R: PageRotator = RotateEntry> {
    loader: DocumentLoader,
    rotator: R,
    archiver: Archiver,
    preview_pages: usize,
}

impl Engine {
    /// Create an engine with the default rotation backend.
    pub fn new() -> Self {
        Self::with_rotator(RotateEntry)
    }

    /// Create an engine using configured defaults.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_preview_pages(config.preview_pages)
            .with_archiver(Archiver::with_default_name(&config.archive_name))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PageRotator> Engine<R> {
    /// Create an engine with a custom rotation backend.
    pub fn with_rotator(rotator: R) -> Self {
        Self {
            loader: DocumentLoader::new(),
            rotator,
            archiver: Archiver::new(),
            preview_pages: DEFAULT_PREVIEW_PAGES,
        }
    }

    /// Replace the document loader.
    pub fn with_loader(mut self, loader: DocumentLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the archive packager.
    pub fn with_archiver(mut self, archiver: Archiver) -> Self {
        self.archiver = archiver;
        self
    }

    /// Set the default number of preview pages.
    pub fn with_preview_pages(mut self, pages: usize) -> Self {
        self.preview_pages = pages;
        self
    }

    /// Default number of preview pages.
    pub fn preview_pages(&self) -> usize {
        self.preview_pages
    }

    /// Package output buffers into a zip archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn archive(&self, buffers: &[Vec<u8>], name: Option<&str>) -> Result<Archive> {
        self.archiver.package(buffers, name)
    }

    pub(crate) fn load(&self, bytes: &[u8]) -> Result<LoadedDocument> {
        self.loader.load(bytes)
    }

    pub(crate) fn rotator(&self) -> &R {
        &self.rotator
    }
}
