//! Merge: concatenate every page of every input, in input order.

use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::pages::{PageCopier, PageRotator};
use super::{Engine, MergeOutput, PageIssue};
use crate::error::Result;
use crate::io::{DocumentWriter, LoadedDocument};

impl<R: PageRotator> Engine<R> {
    /// Merge documents into one, preserving input order.
    ///
    /// An empty input list produces a valid document without pages; callers
    /// are expected to reject that case before reaching the engine.
    ///
    /// # Arguments
    ///
    /// * `buffers` - Serialized input documents, in output order
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be parsed (even after repair) or
    /// the merged document cannot be serialized.
    #[instrument(skip_all, fields(inputs = buffers.len()))]
    pub fn merge(&self, buffers: &[Vec<u8>]) -> Result<MergeOutput> {
        let start = Instant::now();

        let loaded = buffers
            .iter()
            .map(|bytes| self.load(bytes))
            .collect::<Result<Vec<LoadedDocument>>>()?;

        let version = loaded
            .iter()
            .map(|doc| doc.document.version.as_str())
            .max()
            .unwrap_or(super::pages::DEFAULT_VERSION);

        let mut copier = PageCopier::with_version(version);
        let mut skipped = Vec::new();

        for (input, source) in loaded.iter().enumerate() {
            let mut scope = copier.source(&source.document);
            for (page, page_id) in source.page_ids().into_iter().enumerate() {
                if let Err(err) = scope.copy_page(page_id) {
                    warn!(input = input + 1, page = page + 1, %err, "Skipping page");
                    skipped.push(PageIssue::new(input + 1, page + 1, err.to_string()));
                }
            }
            debug!(input = input + 1, pages = source.page_count, "Input appended");
        }

        let page_count = copier.page_count();
        let mut document = copier.finish();
        let bytes = DocumentWriter::new().to_bytes(&mut document)?;

        info!(
            pages = page_count,
            output_bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Merge complete"
        );

        Ok(MergeOutput {
            bytes,
            page_count,
            repaired_inputs: loaded.iter().filter(|doc| doc.was_repaired()).count(),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{page_count, page_texts, pdf_with_pages};
    use super::*;
    use crate::error::PdfOpsError;

    #[test]
    fn test_merge_page_counts() {
        let engine = Engine::new();
        let inputs = vec![pdf_with_pages(2), pdf_with_pages(3), pdf_with_pages(1)];

        let output = engine.merge(&inputs).unwrap();

        assert_eq!(output.page_count, 6);
        assert_eq!(page_count(&output.bytes), 6);
        assert!(output.skipped.is_empty());
        assert_eq!(output.repaired_inputs, 0);
    }

    #[test]
    fn test_merge_preserves_input_order() {
        let engine = Engine::new();
        let inputs = vec![pdf_with_pages(2), pdf_with_pages(1)];

        let output = engine.merge(&inputs).unwrap();
        let texts = page_texts(&output.bytes);

        assert!(texts[0].contains("(Page 1)"));
        assert!(texts[1].contains("(Page 2)"));
        assert!(texts[2].contains("(Page 1)"));
    }

    #[test]
    fn test_merge_empty_input_list() {
        let output = Engine::new().merge(&[]).unwrap();
        assert_eq!(output.page_count, 0);
        assert_eq!(page_count(&output.bytes), 0);
    }

    #[test]
    fn test_merge_rejects_garbage() {
        let inputs = vec![pdf_with_pages(1), b"not a pdf".to_vec()];
        let err = Engine::new().merge(&inputs).unwrap_err();
        assert!(matches!(err, PdfOpsError::MalformedDocument { .. }));
    }
}
