/// Partitioning overhead benchmarks
///
/// Measures the cost of splitting large synthetic suites with both
/// algorithms. Splitting runs once per CI shard before any test executes,
/// so it has to stay negligible next to the suite itself.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repartir::cli::SplitAlgorithm;
use repartir::durations::DurationStore;
use repartir::estimator::estimate;
use repartir::partition::{partition, TestItem};

fn synthetic_suite(size: usize) -> Vec<TestItem> {
    (0..size)
        .map(|i| {
            // Deterministic spread of durations between 10ms and ~5s
            let seconds = 0.01 + (i % 500) as f64 * 0.01;
            TestItem::new(format!("suite/module_{}.py::test_{i}", i % 40), seconds)
        })
        .collect()
}

fn bench_duration_based_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("duration_based_chunks");
    for size in [1_000usize, 10_000, 100_000] {
        let items = synthetic_suite(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let result =
                    partition(black_box(items.clone()), 8, SplitAlgorithm::DurationBasedChunks)
                        .unwrap();
                black_box(result);
            });
        });
    }
    group.finish();
}

fn bench_least_duration(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_duration");
    for size in [1_000usize, 10_000, 100_000] {
        let items = synthetic_suite(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let result =
                    partition(black_box(items.clone()), 8, SplitAlgorithm::LeastDuration).unwrap();
                black_box(result);
            });
        });
    }
    group.finish();
}

fn bench_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimation");
    let suite = synthetic_suite(10_000);
    let ids: Vec<String> = suite.iter().map(|item| item.id.clone()).collect();

    // Half the suite has recorded history
    let mut store = DurationStore::new();
    for item in suite.iter().step_by(2) {
        store.insert(item.id.clone(), item.seconds);
    }

    group.bench_function("estimate_10k_half_known", |b| {
        b.iter(|| {
            let items = estimate(black_box(&ids), black_box(&store));
            black_box(items);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_duration_based_chunks,
    bench_least_duration,
    bench_estimation
);
criterion_main!(benches);
