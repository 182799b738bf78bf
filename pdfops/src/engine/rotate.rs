//! Rotate: rotate the selected pages, keep every page.

use tracing::{info, instrument, warn};

use super::pages::{PageRotator, normalize_angle};
use super::{Engine, PageIssue, RotateOutput};
use crate::error::Result;
use crate::io::DocumentWriter;
use crate::selector::{PageSelection, parse_selector};

impl<R: PageRotator> Engine<R> {
    /// Rotate the pages matched by `selector` clockwise by `angle` degrees.
    ///
    /// The angle is normalized modulo 360. Every page of the input ends up in
    /// the output in its original order. If the selector cannot be parsed at
    /// all, every page is rotated and `selection_fallback` is set.
    ///
    /// `rotated_count` counts selected pages, including pages whose angle was
    /// a no-op or which the backend left unrotated (those are also listed in
    /// `skipped`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or the output cannot be
    /// serialized.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn rotate(&self, bytes: &[u8], angle: i64, selector: &str) -> Result<RotateOutput> {
        let mut source = self.load(bytes)?;
        let total_pages = source.page_count;
        let page_ids = source.page_ids();

        let (selection, selection_fallback) = match parse_selector(selector, total_pages) {
            Ok(selection) => (selection, false),
            Err(err) => {
                warn!(%err, "Selector unparseable, rotating every page");
                (PageSelection::all(total_pages), true)
            }
        };

        let angle = normalize_angle(angle);
        let mut skipped = Vec::new();

        if angle != 0 {
            for &index in selection.indices() {
                let page_id = page_ids[index];
                if let Err(err) = self.rotator().rotate(&mut source.document, page_id, angle) {
                    warn!(page = index + 1, %err, "Leaving page unrotated");
                    skipped.push(PageIssue::new(1, index + 1, err.to_string()));
                }
            }
        }

        let bytes = DocumentWriter::new().to_bytes(&mut source.document)?;

        info!(
            total_pages,
            rotated = selection.len(),
            angle,
            fallback = selection_fallback,
            "Rotate complete"
        );

        Ok(RotateOutput {
            bytes,
            total_pages,
            rotated_count: selection.len(),
            selection_fallback,
            skipped,
        })
    }
}
