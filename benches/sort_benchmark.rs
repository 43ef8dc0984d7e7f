use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;

fn bench_patterns(c: &mut Criterion) {
    let mut rng = rand::rng();
    let count = 1 << 16;

    let random: Vec<u64> = (0..count).map(|_| rng.random()).collect();
    let sorted: Vec<u64> = (0..count as u64).collect();
    let reversed: Vec<u64> = (0..count as u64).rev().collect();
    let few_unique: Vec<u64> = (0..count).map(|_| rng.random_range(0..16)).collect();

    for (name, input) in [
        ("random", &random),
        ("sorted", &sorted),
        ("reversed", &reversed),
        ("few unique", &few_unique),
    ] {
        let mut group = c.benchmark_group(name);
        group.sample_size(20);

        group.bench_function("gritsort", |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| gritsort::sort(black_box(&mut data)),
                BatchSize::SmallInput,
            )
        });

        group.bench_function("slice::sort (stable)", |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| data.sort(),
                BatchSize::SmallInput,
            )
        });

        group.finish();
    }
}

criterion_group!(benches, bench_patterns);
criterion_main!(benches);
