use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use nichesel::non_dominated_sorting::fast_non_dominated_sorting;

const SEED: u64 = 42;

/// Seeded random fitness matrix with values in [0, 100).
fn random_fitness(n: usize, m: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let data: Vec<f64> = (0..n * m).map(|_| rng.random_range(0.0..100.0)).collect();
    Array2::from_shape_vec((n, m), data).expect("Error creating population fitness array")
}

/// Front partitioning over growing pools and objective counts. The truncated
/// variant stops ranking once a quarter of the pool is covered, which is the
/// shape the survival operator actually calls it with.
fn bench_front_partitioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_non_dominated_sorting");
    for &(n, m) in &[(1_000, 2), (5_000, 2), (5_000, 5), (10_000, 3)] {
        let fitness = random_fitness(n, m);
        group.bench_with_input(
            BenchmarkId::new("full", format!("{}x{}", n, m)),
            &fitness,
            |b, fitness| b.iter(|| black_box(fast_non_dominated_sorting(black_box(fitness), n))),
        );
        group.bench_with_input(
            BenchmarkId::new("truncated", format!("{}x{}", n, m)),
            &fitness,
            |b, fitness| {
                b.iter(|| black_box(fast_non_dominated_sorting(black_box(fitness), n / 4)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_front_partitioning);
criterion_main!(benches);
