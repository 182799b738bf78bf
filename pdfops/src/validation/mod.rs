//! Upload validation for pdfops.
//!
//! The engine trusts the buffers it receives. Everything that decides
//! whether a buffer may reach the engine lives here:
//! - File name and extension checks
//! - Size limits
//! - Document signature check
//! - Page count limits (against oversized or malicious documents)
//! - Merge input count limits
//!
//! # Examples
//!
//! ```
//! use pdfops::config::Limits;
//! use pdfops::validation::UploadValidator;
//!
//! let validator = UploadValidator::from_limits(&Limits::default());
//! assert!(validator.validate_pdf("report.pdf", b"%PDF-1.7\n...").is_ok());
//! assert!(validator.validate_pdf("report.txt", b"%PDF-1.7\n...").is_err());
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::config::Limits;
use crate::error::{PdfOpsError, Result};
use crate::io::LoadedDocument;

/// Leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Accepted file extension.
pub const PDF_EXTENSION: &str = "pdf";

/// Summary of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedUpload {
    /// Name of the upload.
    pub name: String,

    /// Size of the upload in bytes.
    pub size: u64,
}

/// Validator for uploaded documents.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
    max_pages_per_file: usize,
    max_files_per_merge: usize,
}

impl UploadValidator {
    /// Create a validator with default limits.
    pub fn new() -> Self {
        Self::from_limits(&Limits::default())
    }

    /// Create a validator enforcing `limits`.
    pub fn from_limits(limits: &Limits) -> Self {
        Self {
            max_file_size: limits.max_file_size,
            max_pages_per_file: limits.max_pages_per_file,
            max_files_per_merge: limits.max_files_per_merge,
        }
    }

    /// Validate a single uploaded document.
    ///
    /// Checks, in order:
    /// - the name is not blank
    /// - the extension is `.pdf` (case-insensitive)
    /// - the buffer is not empty and within the size limit
    /// - the buffer starts with the PDF signature
    ///
    /// # Arguments
    ///
    /// * `name` - Client supplied file name
    /// * `bytes` - File contents
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidUpload`] or
    /// [`PdfOpsError::FileTooLarge`] describing the first failed check.
    pub fn validate_pdf(&self, name: &str, bytes: &[u8]) -> Result<ValidatedUpload> {
        let name = name.trim();

        if name.is_empty() {
            return Err(PdfOpsError::invalid_upload(name, "No file selected"));
        }

        if !has_pdf_extension(name) {
            return Err(PdfOpsError::invalid_upload(
                name,
                "Only PDF files are accepted",
            ));
        }

        if bytes.is_empty() {
            return Err(PdfOpsError::invalid_upload(name, "File is empty"));
        }

        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(PdfOpsError::FileTooLarge {
                name: name.to_string(),
                size,
                limit: self.max_file_size,
            });
        }

        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(PdfOpsError::invalid_upload(
                name,
                "File does not look like a PDF document",
            ));
        }

        debug!(name, size, "Upload accepted");

        Ok(ValidatedUpload {
            name: name.to_string(),
            size,
        })
    }

    /// Enforce the per-document page limit.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::TooManyPages`] when `pages` exceeds the limit.
    pub fn check_page_count(&self, pages: usize) -> Result<()> {
        if pages > self.max_pages_per_file {
            return Err(PdfOpsError::TooManyPages {
                pages,
                limit: self.max_pages_per_file,
            });
        }
        Ok(())
    }

    /// Enforce the page limit on a loaded document.
    ///
    /// # Errors
    ///
    /// See [`UploadValidator::check_page_count`].
    pub fn check_document(&self, document: &LoadedDocument) -> Result<()> {
        self.check_page_count(document.page_count)
    }

    /// Enforce the number of files accepted by a merge.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidUpload`] unless
    /// `2 <= count <= max_files_per_merge`.
    pub fn check_merge_inputs(&self, count: usize) -> Result<()> {
        if count < 2 {
            return Err(PdfOpsError::invalid_upload(
                "merge",
                "At least 2 files are required to merge",
            ));
        }

        if count > self.max_files_per_merge {
            return Err(PdfOpsError::invalid_upload(
                "merge",
                format!(
                    "Too many files: {count} (at most {} can be merged at once)",
                    self.max_files_per_merge
                ),
            ));
        }

        Ok(())
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `name` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}
