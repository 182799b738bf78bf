//! Integration tests for split archives.

use pdfops::Engine;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::common::{labels, pdf};

#[test]
fn test_split_twelve_pages_into_archive() {
    let engine = Engine::new();
    let split = engine.split(&pdf(12), "all", "").unwrap();
    let archive = engine.archive(&split.documents, None).unwrap();

    assert_eq!(archive.name, "pdf_split_results.zip");

    let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
    assert_eq!(zip.len(), 12);

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        assert_eq!(entry.name(), format!("pdf_page_{:03}.pdf", i + 1));

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert_eq!(labels(&bytes), vec![format!("P-{}", i + 1)]);
    }
}

#[test]
fn test_archive_custom_name() {
    let engine = Engine::new();
    let split = engine.split(&pdf(2), "range", "1-2").unwrap();
    let archive = engine.archive(&split.documents, Some("chapters.zip")).unwrap();

    assert_eq!(archive.name, "chapters.zip");
    assert_eq!(archive.entries, vec!["pdf_page_001.pdf"]);
}
