use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlkit::ml::classic::k_means::{
    kmeans, seeds, EmptyClusterPolicy, KMeansConfig, UpdateStrategy,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn generate_blobs(n: usize, dim: usize, centers: usize) -> Vec<Vec<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let offset = (i % centers) as f64 * 20.0;
            (0..dim).map(|_| offset + rng.gen_range(-1.0..1.0)).collect()
        })
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_means");
    for &n in &[1_000, 10_000] {
        let data = generate_blobs(n, 8, 5);
        let seeds = seeds::random(&data, 5, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let strategies = [
            ("online", UpdateStrategy::Online),
            ("batch", UpdateStrategy::Batch),
        ];
        for (name, update) in strategies {
            let config = KMeansConfig::new()
                .with_max_iterations(50)
                .with_update_strategy(update)
                .with_empty_cluster_policy(EmptyClusterPolicy::Retain);
            group.bench_with_input(BenchmarkId::new(name, n), &data, |b, data| {
                b.iter(|| kmeans(black_box(data), black_box(&seeds), &config).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_kmeans);
criterion_main!(benches);
