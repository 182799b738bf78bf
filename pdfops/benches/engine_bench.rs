//! Performance benchmarks for pdfops.
//!
//! Run with: cargo bench
//!
//! Fixtures are generated in memory, so no files are needed.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lopdf::{Document, Object, Stream, dictionary};
use pdfops::{Engine, parse_selector};

/// Build a document with `pages` small text pages.
fn fixture(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=pages)
        .map(|page| {
            let content = format!("BT /F1 12 Tf 72 720 Td (Page {page}) Tj ET").into_bytes();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Benchmark: parse page selectors of growing size
fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_selector");

    for fragments in [1usize, 10, 100] {
        let selector: String = (1..=fragments)
            .map(|i| format!("{}-{}", i * 3, i * 3 + 1))
            .collect::<Vec<_>>()
            .join(",");

        group.bench_with_input(BenchmarkId::from_parameter(fragments), &selector, |b, s| {
            b.iter(|| parse_selector(black_box(s), 500).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: merge documents with increasing page counts
fn bench_merge(c: &mut Criterion) {
    let engine = Engine::new();
    let mut group = c.benchmark_group("merge");

    for pages in [1usize, 10, 50] {
        let inputs = vec![fixture(pages), fixture(pages), fixture(pages)];
        group.bench_with_input(BenchmarkId::from_parameter(pages), &inputs, |b, inputs| {
            b.iter(|| engine.merge(black_box(inputs)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: split every page of a document
fn bench_split_all(c: &mut Criterion) {
    let engine = Engine::new();
    let input = fixture(25);

    c.bench_function("split_all_25_pages", |b| {
        b.iter(|| engine.split(black_box(&input), "all", "").unwrap());
    });
}

/// Benchmark: rotate and compress
fn bench_rotate_compress(c: &mut Criterion) {
    let engine = Engine::new();
    let input = fixture(25);

    c.bench_function("rotate_25_pages", |b| {
        b.iter(|| engine.rotate(black_box(&input), 90, "all").unwrap());
    });

    c.bench_function("compress_25_pages", |b| {
        b.iter(|| engine.compress(black_box(&input)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_selector,
    bench_merge,
    bench_split_all,
    bench_rotate_compress
);
criterion_main!(benches);
