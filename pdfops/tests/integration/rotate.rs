//! Integration tests for rotation.

use pdfops::Engine;
use rstest::rstest;

use crate::common::{labels, pdf, rotations};

#[rstest]
#[case(90, "all", vec![90, 90, 90])]
#[case(180, "2", vec![0, 180, 0])]
#[case(270, "1,3", vec![270, 0, 270])]
#[case(-90, "3", vec![0, 0, 270])]
#[case(720, "all", vec![0, 0, 0])]
fn test_rotate(#[case] angle: i64, #[case] selector: &str, #[case] expected: Vec<i64>) {
    let output = Engine::new().rotate(&pdf(3), angle, selector).unwrap();

    assert_eq!(rotations(&output.bytes), expected);
    assert_eq!(labels(&output.bytes), vec!["P-1", "P-2", "P-3"]);
}

#[test]
fn test_rotate_twice_accumulates() {
    let engine = Engine::new();
    let once = engine.rotate(&pdf(2), 90, "1").unwrap();
    let twice = engine.rotate(&once.bytes, 90, "1").unwrap();

    assert_eq!(rotations(&twice.bytes), vec![180, 0]);
}

#[test]
fn test_rotate_out_of_range_selection_changes_nothing() {
    let output = Engine::new().rotate(&pdf(2), 90, "5-9").unwrap();

    assert_eq!(output.rotated_count, 0);
    assert!(!output.selection_fallback);
    assert_eq!(rotations(&output.bytes), vec![0, 0]);
}

#[test]
fn test_rotate_garbage_selection_falls_back() {
    let output = Engine::new().rotate(&pdf(2), 90, "every page please").unwrap();

    assert!(output.selection_fallback);
    assert_eq!(output.rotated_count, 2);
    assert_eq!(rotations(&output.bytes), vec![90, 90]);
}
