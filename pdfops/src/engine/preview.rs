//! Preview: the first pages as independent, base64 encoded documents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, instrument, warn};

use super::pages::{PageCopier, PageRotator};
use super::{Engine, PageIssue, PreviewOutput};
use crate::error::Result;
use crate::io::DocumentWriter;

impl<R: PageRotator> Engine<R> {
    /// Preview the configured number of leading pages.
    ///
    /// # Errors
    ///
    /// See [`Engine::preview_pages_of`].
    pub fn preview(&self, bytes: &[u8]) -> Result<PreviewOutput> {
        self.preview_pages_of(bytes, self.preview_pages())
    }

    /// Encode up to `max_pages` leading pages as single-page documents.
    ///
    /// Previews start at page 1 and follow page order.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or a preview cannot be
    /// serialized.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn preview_pages_of(&self, bytes: &[u8], max_pages: usize) -> Result<PreviewOutput> {
        let source = self.load(bytes)?;
        let total_pages = source.page_count;

        let mut previews = Vec::new();
        let mut skipped = Vec::new();

        for (index, page_id) in source.page_ids().into_iter().take(max_pages).enumerate() {
            let mut copier = PageCopier::with_version(&source.document.version);
            if let Err(err) = copier.source(&source.document).copy_page(page_id) {
                warn!(page = index + 1, %err, "Skipping preview");
                skipped.push(PageIssue::new(1, index + 1, err.to_string()));
                continue;
            }

            let mut document = copier.finish();
            let page_bytes = DocumentWriter::new().to_bytes(&mut document)?;
            previews.push(STANDARD.encode(page_bytes));
        }

        info!(previews = previews.len(), total_pages, "Preview complete");

        Ok(PreviewOutput {
            previews,
            total_pages,
            skipped,
        })
    }
}
