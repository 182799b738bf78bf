//! Integration tests for compression and previews.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pdfops::{Config, Engine};

use crate::common::{labels, page_count, pdf};

#[test]
fn test_compress_keeps_content() {
    let input = pdf(4);
    let output = Engine::new().compress(&input).unwrap();

    assert_eq!(output.page_count, 4);
    assert_eq!(labels(&output.bytes), labels(&input));
    assert_eq!(output.input_size, input.len());
}

#[test]
fn test_compress_output_is_loadable_by_engine() {
    let engine = Engine::new();
    let compressed = engine.compress(&pdf(3)).unwrap();
    let split = engine.split(&compressed.bytes, "all", "").unwrap();
    assert_eq!(split.len(), 3);
}

#[test]
fn test_preview_default_is_three_pages() {
    let output = Engine::new().preview(&pdf(8)).unwrap();

    assert_eq!(output.total_pages, 8);
    assert_eq!(output.previews.len(), 3);

    let decoded: Vec<Vec<String>> = output
        .previews
        .iter()
        .map(|encoded| labels(&STANDARD.decode(encoded).unwrap()))
        .collect();
    assert_eq!(decoded, vec![vec!["P-1"], vec!["P-2"], vec!["P-3"]]);
}

#[test]
fn test_preview_respects_config() {
    let config = Config {
        preview_pages: 5,
        ..Config::default()
    };
    let output = Engine::from_config(&config).preview(&pdf(8)).unwrap();
    assert_eq!(output.previews.len(), 5);
}

#[test]
fn test_preview_short_document() {
    let output = Engine::new().preview(&pdf(1)).unwrap();

    assert_eq!(output.previews.len(), 1);
    let decoded = STANDARD.decode(&output.previews[0]).unwrap();
    assert_eq!(page_count(&decoded), 1);
}

#[test]
fn test_preview_serializes_to_json() {
    let output = Engine::new().preview(&pdf(1)).unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["total_pages"], 1);
    assert!(json["previews"][0].is_string());
}
