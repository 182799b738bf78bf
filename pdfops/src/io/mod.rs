//! Document I/O for pdfops.
//!
//! Everything here works on in-memory buffers:
//! - Parsing input bytes, with a repair fallback for damaged files
//! - Serializing output documents back to bytes
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::io::{DocumentLoader, DocumentWriter};
//!
//! # fn example(bytes: &[u8]) -> pdfops::Result<()> {
//! let mut loaded = DocumentLoader::new().load(bytes)?;
//! let output = DocumentWriter::new().to_bytes(&mut loaded.document)?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod repair;
pub mod writer;

pub use reader::{DocumentLoader, LoadMode, LoadedDocument};
pub use writer::{DocumentWriter, WriteOptions, format_file_size};

use crate::error::Result;
use lopdf::Document;

/// Load a document from bytes with the default loader.
///
/// # Errors
///
/// Returns an error if the bytes cannot be parsed, even after repair.
pub fn load_document(bytes: &[u8]) -> Result<LoadedDocument> {
    DocumentLoader::new().load(bytes)
}

/// Serialize a document with the default writer.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn save_document(doc: &mut Document) -> Result<Vec<u8>> {
    DocumentWriter::new().to_bytes(doc)
}
