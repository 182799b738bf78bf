//! Error types for pdfops.
//!
//! This module defines all error types that can occur while loading,
//! transforming and packaging documents, and while persisting usage and
//! feedback records.
//!
//! # Error Categories
//!
//! - **Document Errors**: input that cannot be parsed even after repair,
//!   output that cannot be serialized
//! - **Upload Errors**: files rejected before they reach the engine
//! - **Feedback Errors**: invalid ratings or contact messages
//! - **Storage Errors**: JSON persistence failures in the services

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfops operations.
pub type Result<T> = std::result::Result<T, PdfOpsError>;

/// Main error type for pdfops operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfOpsError {
    /// Input buffer could not be parsed, neither strictly nor after repair.
    #[error("Malformed document: {strict}\n  Repair attempt: {repair}")]
    MalformedDocument {
        /// Reason reported by the strict parse.
        strict: String,
        /// Reason reported by the repair pass.
        repair: String,
    },

    /// Output document could not be serialized.
    #[error("Failed to serialize document: {reason}")]
    Serialization {
        /// Details about the failure.
        reason: String,
    },

    /// Archive packaging failed.
    #[error("Failed to build archive: {source}")]
    Archive {
        /// Underlying zip error.
        #[from]
        source: zip::result::ZipError,
    },

    /// Uploaded file was rejected before processing.
    #[error("Invalid upload '{name}': {reason}")]
    InvalidUpload {
        /// Name of the uploaded file.
        name: String,
        /// Why the file was rejected.
        reason: String,
    },

    /// Uploaded file exceeds the configured size limit.
    #[error("File '{name}' is too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Name of the uploaded file.
        name: String,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// Document exceeds the configured page limit.
    #[error("Document has too many pages: {pages} (limit {limit})")]
    TooManyPages {
        /// Page count of the document.
        pages: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Rating outside of the accepted range.
    #[error("Invalid rating {rating}: must be between 1 and 5")]
    InvalidRating {
        /// Submitted value.
        rating: i64,
    },

    /// Contact form is missing required data.
    #[error("Invalid contact message: {reason}")]
    InvalidContact {
        /// Which field failed and why.
        reason: String,
    },

    /// Persistence of a service record failed.
    #[error("Storage error at {}: {reason}", .path.display())]
    Storage {
        /// Backing file.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfOpsError {
    fn from(err: lopdf::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PdfOpsError {
    fn from(err: serde_json::Error) -> Self {
        Self::other(format!("JSON error: {err}"))
    }
}

impl PdfOpsError {
    /// Create a MalformedDocument error.
    pub fn malformed_document(strict: impl Into<String>, repair: impl Into<String>) -> Self {
        Self::MalformedDocument {
            strict: strict.into(),
            repair: repair.into(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an InvalidUpload error.
    pub fn invalid_upload(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUpload {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidContact error.
    pub fn invalid_contact(reason: impl Into<String>) -> Self {
        Self::InvalidContact {
            reason: reason.into(),
        }
    }

    /// Create a Storage error.
    pub fn storage(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's input rather than by
    /// the system.
    ///
    /// Caller errors are safe to report verbatim; everything else should be
    /// surfaced through [`PdfOpsError::user_message`].
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidUpload { .. }
                | Self::FileTooLarge { .. }
                | Self::TooManyPages { .. }
                | Self::InvalidRating { .. }
                | Self::InvalidContact { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Generic, non-leaking message for the end user.
    ///
    /// Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        if self.is_recoverable() {
            return self.to_string();
        }

        match self {
            Self::MalformedDocument { .. } => "Invalid or corrupted file".to_string(),
            _ => "Processing failed".to_string(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidUpload { .. } => 2,
            Self::FileTooLarge { .. } => 2,
            Self::TooManyPages { .. } => 2,
            Self::MalformedDocument { .. } => 3,
            Self::Serialization { .. } => 5,
            Self::Archive { .. } => 5,
            Self::Io { .. } => 5,
            Self::Storage { .. } => 6,
            Self::InvalidRating { .. } => 1,
            Self::InvalidContact { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
        }
    }
}
