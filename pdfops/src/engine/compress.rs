//! Compress: rebuild a document with flate-compressed content streams.
//!
//! Compression is lossless and best effort. Pages whose content cannot be
//! compacted are copied as they are, and a larger output than input is not
//! an error.

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

use super::pages::{PageCopier, PageRotator};
use super::{CompressOutput, Engine, PageIssue};
use crate::error::Result;
use crate::io::{DocumentWriter, WriteOptions};

impl<R: PageRotator> Engine<R> {
    /// Copy every page into a new document and compress its content streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or the output cannot be
    /// serialized.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn compress(&self, bytes: &[u8]) -> Result<CompressOutput> {
        let source = self.load(bytes)?;

        let mut copier = PageCopier::with_version(&source.document.version);
        let mut skipped = Vec::new();
        {
            let mut scope = copier.source(&source.document);
            for (page, page_id) in source.page_ids().into_iter().enumerate() {
                if let Err(err) = scope.copy_page(page_id) {
                    warn!(page = page + 1, %err, "Skipping page");
                    skipped.push(PageIssue::new(1, page + 1, err.to_string()));
                }
            }
        }

        let page_count = copier.page_count();
        let mut document = copier.finish();

        let mut uncompressed_pages = 0;
        for (page, page_id) in document.get_pages() {
            if let Err(reason) = compress_page_contents(&mut document, page_id) {
                debug!(page, %reason, "Page content left uncompressed");
                uncompressed_pages += 1;
            }
        }

        let output = DocumentWriter::with_options(WriteOptions::compressed()).to_bytes(&mut document)?;

        info!(
            pages = page_count,
            input_bytes = bytes.len(),
            output_bytes = output.len(),
            uncompressed_pages,
            "Compress complete"
        );

        Ok(CompressOutput {
            input_size: bytes.len(),
            output_size: output.len(),
            bytes: output,
            page_count,
            uncompressed_pages,
            skipped,
        })
    }
}

/// Flate-compress every content stream of a page.
///
/// Streams that already carry a filter are left alone. Returns the reason
/// when any content stream of the page could not be compressed.
fn compress_page_contents(doc: &mut Document, page_id: ObjectId) -> std::result::Result<(), String> {
    let contents: Vec<ObjectId> = doc.get_page_contents(page_id);
    let mut failure = None;

    for id in contents {
        match doc.get_object_mut(id) {
            Ok(Object::Stream(stream)) => {
                if !stream.allows_compression {
                    failure = Some(format!("content stream {id:?} does not allow compression"));
                    continue;
                }
                if let Err(err) = stream.compress() {
                    failure = Some(format!("content stream {id:?}: {err}"));
                }
            }
            Ok(_) => failure = Some(format!("content object {id:?} is not a stream")),
            Err(err) => failure = Some(format!("content object {id:?}: {err}")),
        }
    }

    match failure {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}
