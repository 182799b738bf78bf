//! Integration tests for splitting.

use pdfops::Engine;
use pdfops::engine::SplitMode;
use rstest::rstest;

use crate::common::{labels, page_count, pdf};

#[test]
fn test_split_all_yields_one_document_per_page() {
    let output = Engine::new().split(&pdf(4), "all", "").unwrap();

    assert_eq!(output.len(), 4);
    for (i, document) in output.documents.iter().enumerate() {
        assert_eq!(labels(document), vec![format!("P-{}", i + 1)]);
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn test_split_all_then_merge_restores_page_order(#[case] pages: usize) {
    let engine = Engine::new();
    let parts = engine.split(&pdf(pages), "all", "").unwrap();
    assert_eq!(parts.len(), pages);

    let merged = engine.merge(&parts.documents).unwrap();

    let expected: Vec<String> = (1..=pages).map(|page| format!("P-{page}")).collect();
    assert_eq!(merged.page_count, pages);
    assert_eq!(page_count(&merged.bytes), pages);
    assert_eq!(labels(&merged.bytes), expected);
}

#[rstest]
#[case("1-2,3-5", vec![vec!["P-1", "P-2"], vec!["P-3", "P-4", "P-5"]])]
#[case("4-9", vec![vec!["P-4", "P-5"]])]
#[case("0-1", vec![vec!["P-1"]])]
#[case("2-2", vec![vec!["P-2"]])]
#[case("7-9,abc", vec![])]
fn test_split_range(#[case] arg: &str, #[case] expected: Vec<Vec<&str>>) {
    let output = Engine::new().split(&pdf(5), "range", arg).unwrap();

    let actual: Vec<Vec<String>> = output.documents.iter().map(|d| labels(d)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_split_range_reports_ignored_fragments() {
    let output = Engine::new().split(&pdf(3), "range", "1-2, 3, x-y, 9-10").unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output.ignored_fragments, vec!["3", "x-y", "9-10"]);
}

#[test]
fn test_split_selected_keeps_order_and_duplicates() {
    let output = Engine::new().split(&pdf(5), "selected", "4,1,4,99,z").unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(labels(&output.documents[0]), vec!["P-4", "P-1", "P-4"]);
}

#[test]
fn test_split_selected_with_nothing_valid_yields_empty_document() {
    let output = Engine::new().split(&pdf(2), "selected", "0,7").unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(page_count(&output.documents[0]), 0);
}

#[test]
fn test_split_unknown_mode_yields_nothing() {
    let output = Engine::new().split(&pdf(2), "odd", "1").unwrap();
    assert!(output.is_empty());
}

#[test]
fn test_split_mode_names_are_case_insensitive() {
    let output = Engine::new().split(&pdf(2), " ALL ", "").unwrap();
    assert_eq!(output.len(), 2);
}

#[test]
fn test_split_with_parsed_mode() {
    let mode: SplitMode = "range".parse().unwrap();
    let output = Engine::new().split_with(&pdf(3), mode, "2-3").unwrap();
    assert_eq!(labels(&output.documents[0]), vec!["P-2", "P-3"]);
}
