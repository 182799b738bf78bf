//! Split: produce one or more documents from page subsets of one input.
//!
//! The three modes have deliberately different shapes:
//!
//! | mode       | argument            | outputs                          |
//! |------------|---------------------|----------------------------------|
//! | `all`      | ignored             | one single-page document a page  |
//! | `range`    | `"1-3,5-9"`         | one document per usable range    |
//! | `selected` | `"4,1,4"`           | exactly one document, list order |

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use lopdf::ObjectId;
use tracing::{debug, info, instrument, warn};

use super::pages::{PageCopier, PageRotator};
use super::{Engine, PageIssue, SplitOutput};
use crate::error::{PdfOpsError, Result};
use crate::io::{DocumentWriter, LoadedDocument};
use crate::selector::{clamp_range, fragments, parse_page_number, parse_range};

/// How a document is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One document per page.
    All,
    /// One document per `start-end` fragment.
    Range,
    /// One document with the listed pages.
    Selected,
}

impl SplitMode {
    /// Mode name as accepted by [`SplitMode::from_str`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Range => "range",
            Self::Selected => "selected",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = PdfOpsError;

    /// Parse a split mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `all`, `range` or `selected`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "range" => Ok(Self::Range),
            "selected" => Ok(Self::Selected),
            _ => Err(PdfOpsError::other(format!(
                "Invalid split mode: {s}. Must be one of: all, range, selected"
            ))),
        }
    }
}

impl<R: PageRotator> Engine<R> {
    /// Split a document according to a mode name.
    ///
    /// Unknown mode names yield an empty result rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or an output cannot be
    /// serialized.
    pub fn split(&self, bytes: &[u8], mode: &str, arg: &str) -> Result<SplitOutput> {
        let source = self.load(bytes)?;

        match mode.parse::<SplitMode>() {
            Ok(mode) => self.split_loaded(&source, mode, arg),
            Err(_) => {
                debug!(mode, "Unknown split mode, nothing to do");
                Ok(SplitOutput::default())
            }
        }
    }

    /// Split a document with an already parsed mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or an output cannot be
    /// serialized.
    pub fn split_with(&self, bytes: &[u8], mode: SplitMode, arg: &str) -> Result<SplitOutput> {
        let source = self.load(bytes)?;
        self.split_loaded(&source, mode, arg)
    }

    #[instrument(skip_all, fields(mode = %mode, pages = source.page_count))]
    fn split_loaded(&self, source: &LoadedDocument, mode: SplitMode, arg: &str) -> Result<SplitOutput> {
        let page_ids = source.page_ids();
        let mut output = SplitOutput::default();

        match mode {
            SplitMode::All => {
                for index in 0..page_ids.len() {
                    let document =
                        build_document(source, &page_ids, [index + 1], &mut output.skipped)?;
                    output.documents.push(document);
                }
            }
            SplitMode::Range => {
                for fragment in fragments(arg) {
                    let Some(range) = usable_range(fragment, page_ids.len()) else {
                        debug!(fragment, "Ignoring range fragment");
                        output.ignored_fragments.push(fragment.to_string());
                        continue;
                    };
                    let document = build_document(source, &page_ids, range, &mut output.skipped)?;
                    output.documents.push(document);
                }
            }
            SplitMode::Selected => {
                let mut pages = Vec::new();
                for fragment in fragments(arg) {
                    match parse_page_number(fragment) {
                        Some(page) if page >= 1 && page <= page_ids.len() as i64 => {
                            pages.push(page as usize);
                        }
                        _ => output.ignored_fragments.push(fragment.to_string()),
                    }
                }
                let document = build_document(source, &page_ids, pages, &mut output.skipped)?;
                output.documents.push(document);
            }
        }

        info!(
            documents = output.documents.len(),
            ignored = output.ignored_fragments.len(),
            "Split complete"
        );
        Ok(output)
    }
}

/// Contiguous 1-based pages described by a `start-end` fragment, if any.
fn usable_range(fragment: &str, total_pages: usize) -> Option<RangeInclusive<usize>> {
    if !fragment.contains('-') {
        return None;
    }
    let (start, end) = parse_range(fragment)?;
    clamp_range(start, end, total_pages)
}

/// Copy the given 1-based pages, in order, into a new serialized document.
fn build_document(
    source: &LoadedDocument,
    page_ids: &[ObjectId],
    pages: impl IntoIterator<Item = usize>,
    skipped: &mut Vec<PageIssue>,
) -> Result<Vec<u8>> {
    let mut copier = PageCopier::with_version(&source.document.version);
    {
        let mut scope = copier.source(&source.document);
        for page in pages {
            let Some(&page_id) = page_ids.get(page - 1) else {
                continue;
            };
            if let Err(err) = scope.copy_page(page_id) {
                warn!(page, %err, "Skipping page");
                skipped.push(PageIssue::new(1, page, err.to_string()));
            }
        }
    }

    let mut document = copier.finish();
    DocumentWriter::new().to_bytes(&mut document)
}
