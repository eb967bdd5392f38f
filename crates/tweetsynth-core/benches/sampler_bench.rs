use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tweetsynth_core::{BinIndex, LadderSearch, TfidfVector, WeibullParams, WordSampler};

/// A vocabulary with `distinct` score levels, a few words per level.
fn index(words: usize, distinct: usize) -> BinIndex {
    let vector: TfidfVector = (0..words)
        .map(|i| (format!("w{i}"), (i % distinct) as f64 * 0.0005))
        .collect();
    BinIndex::build(&vector).unwrap()
}

fn bench_sample(c: &mut Criterion) {
    let params = WeibullParams::new(0.34, 2.1e-3).unwrap();
    let mut group = c.benchmark_group("sample_word");

    for distinct in [16, 256, 4096] {
        let idx = index(distinct * 4, distinct);
        for search in [LadderSearch::Linear, LadderSearch::Binary] {
            let sampler = WordSampler::new(0.0, search);
            let mut rng = StdRng::seed_from_u64(42);
            group.bench_with_input(
                BenchmarkId::new(format!("{search:?}"), distinct),
                &idx,
                |b, idx| b.iter(|| black_box(sampler.sample("bench", params, idx, &mut rng).unwrap())),
            );
        }
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let vector: TfidfVector = (0..20_000)
        .map(|i| (format!("w{i}"), (i % 1500) as f64 * 0.0001))
        .collect();
    c.bench_function("bin_index_build_20k", |b| {
        b.iter(|| black_box(BinIndex::build(&vector).unwrap()))
    });
}

criterion_group!(benches, bench_sample, bench_build);
criterion_main!(benches);
