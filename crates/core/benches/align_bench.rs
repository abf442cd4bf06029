#[path = "common/corpus.rs"]
mod corpus;
#[path = "common/rng.rs"]
mod rng;
#[path = "common/tier.rs"]
mod tier;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use linealign_core::harness::{NullSink, Sweep, run_batch};
use linealign_core::similarity::{LocalitySearch, PreparedText};
use linealign_core::{AlgorithmId, AlignConfig, Aligner, HmmParams, ScoreMode, score};

use corpus::synthetic_document;
use tier::{BenchTier, bench_seed, bench_tier, configure_group};

fn bench_similarity(c: &mut Criterion) {
    let tier = bench_tier();
    let doc = synthetic_document(bench_seed(), 8);
    let line = doc.lines[1].text.clone();
    let paragraph = doc.body[0].text.clone();

    let mut group = c.benchmark_group("similarity");
    configure_group(&mut group, tier);
    group.bench_function("ratio", |b| {
        b.iter(|| black_box(score(&line, &paragraph, ScoreMode::Ratio)))
    });
    group.bench_function("partial_ratio", |b| {
        b.iter(|| black_box(score(&line, &paragraph, ScoreMode::PartialRatio)))
    });

    let references = PreparedText::prepare_all(doc.body.iter().map(|r| r.text.as_str()));
    let needle = PreparedText::new(&line);
    let search = LocalitySearch::new(2, 0.75);
    group.bench_function("locality_search", |b| {
        b.iter(|| black_box(search.search(&needle, &references, references.len() / 2)))
    });
    group.finish();
}

fn bench_aligners(c: &mut Criterion) {
    let tier = bench_tier();
    let sizes: &[usize] = if tier == BenchTier::Quick {
        &[10, 40]
    } else {
        &[10, 40, 160]
    };

    let mut group = c.benchmark_group("align");
    configure_group(&mut group, tier);

    for &paragraphs in sizes {
        let doc = synthetic_document(bench_seed() ^ paragraphs as u64, paragraphs);
        group.throughput(Throughput::Elements(doc.lines.len() as u64));
        for id in AlgorithmId::ALL {
            let aligner = id
                .build(AlignConfig::default(), HmmParams::default())
                .expect("default config is valid");
            group.bench_with_input(BenchmarkId::new(id.as_str(), paragraphs), &doc, |b, doc| {
                b.iter(|| {
                    let result = aligner.align(doc).expect("align");
                    black_box(result.confident_count());
                })
            });
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = bench_seed();
    let docs: Vec<_> = (0..16).map(|i| synthetic_document(seed ^ i, 12)).collect();
    let sweep = Sweep::new(
        AlgorithmId::ALL.to_vec(),
        vec![0.6, 0.75, 0.9],
        AlignConfig::default(),
        HmmParams::default(),
    )
    .expect("valid sweep");

    let mut group = c.benchmark_group("batch");
    configure_group(&mut group, tier);
    group.throughput(Throughput::Elements(docs.len() as u64));
    for threads in [1, 4] {
        group.bench_with_input(BenchmarkId::new("sweep", threads), &threads, |b, &threads| {
            b.iter(|| {
                let report = run_batch(docs.as_slice(), &sweep, &mut NullSink, Some(threads))
                    .expect("batch");
                black_box(report.processed);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_similarity, bench_aligners, bench_batch);
criterion_main!(benches);
