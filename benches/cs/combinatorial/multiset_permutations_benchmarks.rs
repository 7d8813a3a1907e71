use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mpermute::cs::combinatorial::{
    all_permutations, permutations, Advance, KeyedMultiset, PrefixShiftEngine,
};

fn multiset(n: usize, distinct: usize) -> Vec<u32> {
    (0..n).map(|i| (i % distinct) as u32).collect()
}

fn bench_engine_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_shift_advance");
    for &(n, distinct) in &[(8, 8), (10, 3), (12, 2)] {
        let keys = multiset(n, distinct);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", n, distinct)),
            &keys,
            |b, keys| {
                b.iter(|| {
                    let mut engine = PrefixShiftEngine::new(black_box(keys));
                    let mut steps = 0usize;
                    while engine.advance() == Advance::Produced {
                        steps += 1;
                    }
                    steps
                })
            },
        );
    }
    group.finish();
}

fn bench_lazy_vs_eager(c: &mut Criterion) {
    let items = multiset(9, 3);
    c.bench_function("lazy_permutations_9x3", |b| {
        b.iter(|| permutations(black_box(&items)).unwrap().count())
    });
    c.bench_function("all_permutations_9x3", |b| {
        b.iter(|| all_permutations(black_box(&items)).unwrap().len())
    });
}

fn bench_key_resolution(c: &mut Criterion) {
    let items: Vec<u32> = (0..10_000).map(|i| (i * 7919) % 101).collect();
    c.bench_function("keyed_multiset_10000", |b| {
        b.iter(|| KeyedMultiset::natural(black_box(&items)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_engine_advance,
    bench_lazy_vs_eager,
    bench_key_resolution
);
criterion_main!(benches);
