//! Integration tests for merging.

use pdfops::{Engine, PdfOpsError};
use rstest::rstest;

use crate::common::{labelled_pdf, labels, page_count, pages_have_media_box};

#[rstest]
#[case(&[1, 1])]
#[case(&[2, 3, 1])]
#[case(&[5, 0, 2])]
#[case(&[1, 1, 1, 1, 1, 1, 1, 1])]
fn test_merge_page_count_is_sum(#[case] sizes: &[usize]) {
    let inputs: Vec<Vec<u8>> = sizes
        .iter()
        .enumerate()
        .map(|(i, &n)| labelled_pdf(&i.to_string(), n))
        .collect();

    let merged = Engine::new().merge(&inputs).unwrap();

    let expected: usize = sizes.iter().sum();
    assert_eq!(merged.page_count, expected);
    assert_eq!(page_count(&merged.bytes), expected);
    assert!(merged.skipped.is_empty());
}

#[test]
fn test_merge_preserves_input_then_page_order() {
    let merged = Engine::new()
        .merge(&[labelled_pdf("A", 2), labelled_pdf("B", 3), labelled_pdf("C", 1)])
        .unwrap();

    assert_eq!(labels(&merged.bytes), vec!["A-1", "A-2", "B-1", "B-2", "B-3", "C-1"]);
}

#[test]
fn test_merge_materializes_inherited_attributes() {
    let merged = Engine::new()
        .merge(&[labelled_pdf("A", 2), labelled_pdf("B", 2)])
        .unwrap();
    assert!(pages_have_media_box(&merged.bytes));
}

#[test]
fn test_merge_same_document_twice() {
    let doc = labelled_pdf("X", 2);
    let merged = Engine::new().merge(&[doc.clone(), doc]).unwrap();
    assert_eq!(labels(&merged.bytes), vec!["X-1", "X-2", "X-1", "X-2"]);
}

#[test]
fn test_merge_rejects_unparseable_input() {
    let result = Engine::new().merge(&[labelled_pdf("A", 1), b"not a pdf at all".to_vec()]);
    assert!(matches!(result, Err(PdfOpsError::MalformedDocument { .. })));
}
