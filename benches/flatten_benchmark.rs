//! Benchmarks for flattening and assembly throughput.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic parser output.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

use docflat::model::ParseResult;
use docflat::parser::Flattener;
use docflat::render::{Assembler, AssembleOptions, CleanupPreset};

/// Creates synthetic parser output with the given number of elements.
fn create_parse_result(element_count: usize) -> ParseResult {
    let elements: Vec<Value> = (0..element_count)
        .map(|i| {
            let page = (i / 20) as i64;
            match i % 5 {
                0 => json!({
                    "type": "section_header",
                    "content": format!("Section {}", i),
                    "bbox": [{"page_id": page, "coord": [72.0, 90.0, 540.0, 110.0]}]
                }),
                1 => json!({
                    "type": "figure",
                    "content": null,
                    "description": "A bar chart comparing quarterly revenue by region.",
                    "bbox": [{"page_id": page, "coord": [72.0, 120.0, 540.0, 400.0]}]
                }),
                2 => json!({
                    "type": "table",
                    "content": "<table><tr><td>Q1</td><td>42</td></tr></table>",
                    "bbox": [
                        {"page_id": page, "coord": [72.0, 420.0, 540.0, 700.0]},
                        {"page_id": page + 1, "coord": [72.0, 60.0, 540.0, 200.0]}
                    ]
                }),
                3 => json!({"type": "page_footer", "content": null, "description": null}),
                _ => json!({
                    "type": "text",
                    "content": "The quick brown fox jumps over the lazy dog. ﬁne print follows.",
                    "bbox": [{"page_id": page, "coord": [72.0, 200.0, 540.0, 260.0]}]
                }),
            }
        })
        .collect();

    ParseResult::with_elements(elements)
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    let flattener = Flattener::new();

    for count in [100, 1_000, 10_000] {
        let result = create_parse_result(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &result, |b, result| {
            b.iter(|| flattener.flatten(black_box("bench.pdf"), black_box(result)))
        });
    }

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let elements = Flattener::new()
        .flatten("bench.pdf", &create_parse_result(1_000))
        .map(|f| f.into_elements())
        .unwrap_or_default();

    let plain = Assembler::new();
    group.bench_function("plain", |b| b.iter(|| plain.assemble(black_box(&elements))));

    let cleaned =
        Assembler::with_options(AssembleOptions::new().with_cleanup_preset(CleanupPreset::Standard));
    group.bench_function("standard_cleanup", |b| {
        b.iter(|| cleaned.assemble(black_box(&elements)))
    });

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_assemble);
criterion_main!(benches);
