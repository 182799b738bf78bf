//! Integration tests for damaged inputs.
//!
//! A damaged input must either be repaired and processed, or produce exactly
//! one error. It must never panic.

use pdfops::io::{DocumentLoader, LoadMode};
use pdfops::{Engine, PdfOpsError};
use rstest::rstest;

use lopdf::Object;

use crate::common::{labels, pdf, rotations, with_page_entry, with_page_tree_entry};

fn replace(bytes: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let position = bytes
        .windows(from.len())
        .rposition(|window| window == from)
        .unwrap();
    let mut out = bytes[..position].to_vec();
    out.extend_from_slice(to);
    out.extend_from_slice(&bytes[position + from.len()..]);
    out
}

#[rstest]
#[case(0.1)]
#[case(0.3)]
#[case(0.5)]
#[case(0.7)]
#[case(0.9)]
#[case(0.99)]
fn test_truncated_input_is_repaired_or_rejected(#[case] keep: f64) {
    let input = pdf(4);
    let truncated = &input[..(input.len() as f64 * keep) as usize];

    match Engine::new().split(truncated, "all", "") {
        Ok(output) => assert!(output.len() <= 4),
        Err(err) => assert!(matches!(err, PdfOpsError::MalformedDocument { .. })),
    }
}

#[test]
fn test_broken_xref_is_repaired() {
    let input = pdf(3);
    let damaged = replace(&input, b"startxref", b"startxrex");

    let output = Engine::new().rotate(&damaged, 90, "all").unwrap();
    assert_eq!(labels(&output.bytes), vec!["P-1", "P-2", "P-3"]);
}

#[test]
fn test_leading_and_trailing_garbage() {
    let mut damaged = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
    damaged.extend_from_slice(&pdf(2));
    damaged.extend_from_slice(b"\n<html>trailing junk</html>");

    let output = Engine::new().merge(&[damaged, pdf(1)]).unwrap();
    assert_eq!(output.page_count, 3);
}

#[test]
fn test_strict_only_loader_does_not_repair() {
    let input = pdf(1);
    let cut = input
        .windows(6)
        .rposition(|window| window == b"endobj")
        .unwrap()
        + 6;
    let damaged = &input[..cut];

    let repaired = DocumentLoader::new().load(damaged).unwrap();
    assert_eq!(repaired.mode, LoadMode::Repaired);
    assert_eq!(repaired.page_count, 1);

    let strict = DocumentLoader::strict_only().load(damaged);
    assert!(matches!(strict, Err(PdfOpsError::MalformedDocument { .. })));
}

#[rstest]
#[case(b"".as_slice())]
#[case(b"%PDF-1.7".as_slice())]
#[case(b"\x00\x01\x02\x03garbage".as_slice())]
#[case(b"%PDF-1.4\n1 0 obj\n<< /Type /Page >>\nendobj\n%%EOF".as_slice())]
fn test_unrecoverable_input_is_one_error(#[case] bytes: &[u8]) {
    let err = Engine::new().compress(bytes).unwrap_err();

    assert!(matches!(err, PdfOpsError::MalformedDocument { .. }));
    assert_eq!(err.user_message(), "Invalid or corrupted file");
}

/// Run every page operation on `bytes`. Each one must succeed or report the
/// input as malformed.
fn assert_processed_or_rejected(bytes: &[u8]) {
    let engine = Engine::new();
    let results = [
        engine.merge(&[bytes.to_vec(), pdf(1)]).map(|_| ()),
        engine.split(bytes, "all", "").map(|_| ()),
        engine.rotate(bytes, 90, "all").map(|_| ()),
        engine.compress(bytes).map(|_| ()),
    ];

    for result in results {
        if let Err(err) = result {
            assert!(
                matches!(err, PdfOpsError::MalformedDocument { .. }),
                "unexpected error: {err}"
            );
        }
    }
}

/// A document without cross-reference table whose only page has object
/// number `page_number`.
fn sparse_pdf(page_number: u64) -> Vec<u8> {
    format!(
        "%PDF-1.4\n\
         1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
         2 0 obj\n<< /Type /Pages /Kids [{page_number} 0 R] /Count 1 >>\nendobj\n\
         {page_number} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\n"
    )
    .into_bytes()
}

#[rstest]
#[case::max_u32(4_294_967_295)]
#[case::beyond_object_limit(30_000_000)]
#[case::beyond_u32(99_999_999_999)]
#[case::at_object_limit(8_388_607)]
#[case::small(3)]
fn test_extreme_object_numbers(#[case] page_number: u64) {
    let input = sparse_pdf(page_number);
    assert_processed_or_rejected(&input);
}

#[test]
fn test_huge_catalog_number_is_rejected_without_allocating() {
    let input = b"%PDF-1.4\n4294967295 0 obj\n<< /Type /Catalog >>\nendobj\n";

    let err = DocumentLoader::new().load(input).unwrap_err();
    assert!(matches!(err, PdfOpsError::MalformedDocument { .. }));
}

#[rstest]
#[case(i64::MAX, vec![97, 97])]
#[case(i64::MIN, vec![82, 82])]
#[case(-450, vec![0, 0])]
fn test_rotate_with_absurd_stored_rotation(#[case] stored: i64, #[case] expected: Vec<i64>) {
    let input = with_page_entry(&pdf(2), "Rotate", stored);

    let output = Engine::new().rotate(&input, 90, "all").unwrap();

    assert_eq!(output.rotated_count, 2);
    assert_eq!(rotations(&output.bytes), expected);
    assert_processed_or_rejected(&input);
}

#[rstest]
#[case::inflated(1_000_000)]
#[case::negative(-5)]
#[case::zero(0)]
fn test_page_count_lies(#[case] count: i64) {
    let input = with_page_tree_entry(&pdf(3), "Count", |_| Object::Integer(count));
    assert_processed_or_rejected(&input);
}

#[test]
fn test_page_tree_parent_cycle() {
    let input = with_page_tree_entry(&pdf(2), "Parent", Object::Reference);

    let output = Engine::new().split(&input, "all", "").unwrap();
    assert_eq!(output.len(), 2);
    assert_processed_or_rejected(&input);
}

#[test]
fn test_non_numeric_rotate_entry() {
    let input = with_page_entry(&pdf(2), "Rotate", Object::Name(b"sideways".to_vec()));

    let output = Engine::new().rotate(&input, 180, "1").unwrap();
    assert_eq!(rotations(&output.bytes), vec![180, 0]);
}
