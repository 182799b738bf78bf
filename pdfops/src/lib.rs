//! pdfops - Merge, split, rotate, compress and preview PDF documents.
//!
//! This library works on documents held entirely in memory. It provides:
//!
//! - A page-selector parser (`"1-3,5"`, `"all"`)
//! - Tolerant document loading with a repair pass for damaged files
//! - A stateless operation engine with per-page "keep going" error handling
//! - Zip packaging of multi-document results
//! - Upload validation against configurable limits
//! - Usage statistics, ratings and contact messages persisted as JSON
//!
//! # Examples
//!
//! ## Split into single pages
//!
//! ```no_run
//! use pdfops::Engine;
//!
//! # fn example(bytes: Vec<u8>) -> pdfops::Result<()> {
//! let engine = Engine::new();
//! let split = engine.split(&bytes, "all", "")?;
//! let archive = engine.archive(&split.documents, None)?;
//! std::fs::write(&archive.name, &archive.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Validate before processing
//!
//! ```no_run
//! use pdfops::{Config, Engine};
//! use pdfops::validation::UploadValidator;
//!
//! # fn example(name: &str, bytes: Vec<u8>) -> pdfops::Result<()> {
//! let config = Config::default();
//! let validator = UploadValidator::from_limits(&config.limits);
//! validator.validate_pdf(name, &bytes)?;
//!
//! let rotated = Engine::from_config(&config).rotate(&bytes, 90, "1,3")?;
//! println!("{} page(s) rotated", rotated.rotated_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod output;
pub mod selector;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use engine::Engine;
pub use error::{PdfOpsError, Result};
pub use selector::{PageSelection, parse_selector};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
