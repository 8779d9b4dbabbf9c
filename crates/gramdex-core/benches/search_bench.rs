//! Benchmarks for corpus indexing and both query types

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use gramdex_core::Searcher;

const WORDS: &[&str] = &[
    "open", "file", "save", "close", "window", "search", "replace", "settings", "theme", "font",
    "size", "toggle", "sidebar", "terminal", "split", "editor", "format", "document", "select",
    "line", "copy", "paste", "undo", "redo", "zoom", "reset", "panel", "explorer", "debug", "run",
];

/// Deterministic corpus of short command-palette style sentences.
fn corpus(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let len = 2 + i % 5;
            (0..len)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let sentences = corpus(10_000);

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(sentences.len() as u64));

    group.bench_function("10k_sentences", |b| {
        b.iter_batched(
            || sentences.clone(),
            |sentences| black_box(Searcher::new(sentences).unwrap()),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let mut searcher = Searcher::new(corpus(10_000)).unwrap();

    let mut group = c.benchmark_group("best_match");
    group.throughput(Throughput::Elements(searcher.len() as u64));

    group.bench_function("10k_sentences", |b| {
        b.iter(|| black_box(searcher.find_best_match(black_box("toggle sidebr")).unwrap()))
    });

    group.finish();
}

fn bench_windowed_search(c: &mut Criterion) {
    let mut searcher = Searcher::new(corpus(10_000)).unwrap();

    let mut group = c.benchmark_group("windowed_search");
    group.throughput(Throughput::Elements(searcher.len() as u64));

    for gram_len in [2, 3] {
        group.bench_function(format!("10k_sentences_g{gram_len}"), |b| {
            b.iter(|| {
                let ranking = searcher
                    .search(black_box("fromat documnet"), 10, gram_len, 0.4)
                    .unwrap();
                black_box(ranking[0])
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_best_match, bench_windowed_search);
criterion_main!(benches);
