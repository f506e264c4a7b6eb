use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use midweek_core::{Document, SelectionGroups, StaticFetcher, Workbook, WorkbookConfig, validate_landmarks};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let html = fixture("workbook.html");

    c.bench_function("parse", |b| b.iter(|| Document::parse(black_box(&html))));
}

fn bench_selection_groups(c: &mut Criterion) {
    let html = fixture("workbook.html");
    let doc = Document::parse(&html).unwrap();

    c.bench_function("selection_groups", |b| b.iter(|| SelectionGroups::build(black_box(&doc))));
}

fn bench_validate_landmarks(c: &mut Criterion) {
    let html = fixture("workbook.html");
    let doc = Document::parse(&html).unwrap();

    c.bench_function("validate_landmarks", |b| b.iter(|| validate_landmarks(black_box(&doc))));
}

fn bench_full_program(c: &mut Criterion) {
    let html = fixture("workbook.html");
    let fetcher = StaticFetcher::from_file("../../tests/fixtures/references.json").unwrap();
    let workbook = Workbook::new(WorkbookConfig::default(), Arc::new(fetcher)).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("full_program", |b| {
        b.iter(|| runtime.block_on(workbook.extract_full_program(black_box(html.as_str()))))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_selection_groups,
    bench_validate_landmarks,
    bench_full_program
);
criterion_main!(benches);
