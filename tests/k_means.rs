use approx::assert_relative_eq;
use mlkit::ml::classic::k_means::{
    kmeans, seeds, EmptyClusterPolicy, KMeans, KMeansConfig, Termination, UpdateStrategy,
};
use mlkit::Error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn one_dimensional(values: &[f64]) -> Vec<Vec<f64>> {
    values.iter().map(|&v| vec![v]).collect()
}

fn member_values(result: &mlkit::ml::classic::KMeansResult, cluster: usize) -> Vec<f64> {
    let mut values: Vec<f64> = result.clusters()[cluster]
        .members()
        .iter()
        .map(|m| m.data()[0])
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    values
}

#[test]
fn test_two_groups_on_a_line() {
    let data = one_dimensional(&[1.0, 2.0, 8.0, 9.0, 11.0]);
    let seeds = one_dimensional(&[0.0, 10.0]);
    let config = KMeansConfig::new().with_max_iterations(10);

    let result = kmeans(&data, &seeds, &config).unwrap();

    assert_eq!(result.termination, Termination::Converged);
    assert!(result.rounds <= 10);
    assert_eq!(member_values(&result, 0), vec![1.0, 2.0]);
    assert_eq!(member_values(&result, 1), vec![8.0, 9.0, 11.0]);
    assert_relative_eq!(result.clusters()[0].centroid()[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(result.clusters()[1].centroid()[0], 28.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_batch_update_matches_online_on_separated_blobs() {
    let data = vec![
        vec![0.0, 0.0],
        vec![0.5, -0.2],
        vec![-0.3, 0.4],
        vec![10.0, 10.0],
        vec![10.4, 9.7],
        vec![9.8, 10.3],
        vec![-10.0, 10.0],
        vec![-9.6, 10.2],
    ];
    let seeds = vec![vec![1.0, 1.0], vec![9.0, 9.0], vec![-9.0, 9.0]];

    let online = kmeans(&data, &seeds, &KMeansConfig::new()).unwrap();
    let batch = kmeans(
        &data,
        &seeds,
        &KMeansConfig::new().with_update_strategy(UpdateStrategy::Batch),
    )
    .unwrap();

    assert!(online.converged() && batch.converged());
    assert_eq!(online.assignments(), &[0, 0, 0, 1, 1, 1, 2, 2]);
    assert_eq!(online.assignments(), batch.assignments());
    for (a, b) in online.clusters().iter().zip(batch.clusters()) {
        for (x, y) in a.centroid_ref().iter().zip(b.centroid_ref()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let data: Vec<Vec<f64>> = (0..60)
        .map(|i| vec![(i % 7) as f64 * 1.3, (i % 5) as f64 - (i % 3) as f64])
        .collect();
    let seeds = seeds::random(&data, 4, &mut rng).unwrap();
    let config = KMeansConfig::new()
        .with_max_iterations(25)
        .with_empty_cluster_policy(EmptyClusterPolicy::Retain);

    let first = kmeans(&data, &seeds, &config).unwrap();
    let second = kmeans(&data, &seeds, &config).unwrap();

    assert_eq!(first.assignments(), second.assignments());
    assert_eq!(first.partition.centroids(), second.partition.centroids());
    assert_eq!(first.rounds, second.rounds);
}

#[test]
fn test_every_point_in_exactly_one_cluster() {
    let data: Vec<Vec<f64>> = (0..30).map(|i| vec![(i * i % 17) as f64]).collect();
    let seeds = seeds::first_k(&data, 3).unwrap();
    let config = KMeansConfig::new().with_empty_cluster_policy(EmptyClusterPolicy::Retain);
    let result = kmeans(&data, &seeds, &config).unwrap();

    let mut seen = vec![0; data.len()];
    for (c, cluster) in result.clusters().iter().enumerate() {
        for index in cluster.members().iter().filter_map(|m| m.index()) {
            seen[index] += 1;
            assert_eq!(result.assignments()[index], c);
        }
    }
    assert!(seen.iter().all(|&count| count == 1));
}

#[test]
fn test_unreachable_seed_is_reported() {
    let data = one_dimensional(&[1.0, 2.0, 3.0]);
    let seeds = one_dimensional(&[0.0, 500.0]);

    let err = KMeans::default().fit(&data, &seeds).unwrap_err();
    assert_eq!(err, Error::DegeneratePartition { cluster: 1, round: 0 });

    let retained = KMeans::new(
        KMeansConfig::new().with_empty_cluster_policy(EmptyClusterPolicy::Retain),
    )
    .fit(&data, &seeds)
    .unwrap();
    assert_eq!(retained.partition.retained(), 1);
    assert_eq!(retained.assignments(), &[0, 0, 0]);
    assert_eq!(retained.clusters()[1].centroid(), vec![500.0]);
}

#[test]
fn test_dimension_mismatch_propagates() {
    let data = vec![vec![1.0, 2.0], vec![3.0]];
    let seeds = vec![vec![0.0, 0.0]];
    let err = KMeans::default().fit(&data, &seeds).unwrap_err();
    assert_eq!(err, Error::DimensionMismatch { expected: 2, found: 1 });
}
