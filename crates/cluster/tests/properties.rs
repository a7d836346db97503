//! Invariants that hold for any valid clustering input.

use marlin_cluster::{ClusterError, KMeansConfig, kmeans};
use marlin_progress::{CancelToken, NullSink, ProgressEvent, Reporter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn uniform_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.random_range(-10.0..10.0)).collect())
        .collect()
}

#[test]
fn counts_sum_to_n_and_assignments_in_range() {
    for (k, seed) in [(1, 0), (2, 1), (5, 2), (12, 3)] {
        let points = uniform_points(150, 3, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sink = NullSink;
        let mut reporter = Reporter::new(&mut sink, CancelToken::new());
        let r = kmeans(&points, &KMeansConfig::new(k), &mut rng, &mut reporter).unwrap();

        assert_eq!(r.cluster_counts().len(), k);
        assert_eq!(r.cluster_counts().iter().sum::<usize>(), points.len());
        assert_eq!(r.assignments().len(), points.len());
        assert!(r.assignments().iter().all(|&a| a < k));
        assert!(r.iterations() <= 100);
        assert!(r.inertia() >= 0.0);
        assert!((-1.0..=1.0).contains(&r.silhouette_score()));
    }
}

#[test]
fn same_seed_same_result() {
    let points = uniform_points(80, 2, 21);
    let config = KMeansConfig::new(4);
    let results: Vec<_> = (0..2)
        .map(|_| {
            let mut rng = StdRng::seed_from_u64(1234);
            let mut sink = NullSink;
            let mut reporter = Reporter::new(&mut sink, CancelToken::new());
            kmeans(&points, &config, &mut rng, &mut reporter).unwrap()
        })
        .collect();
    assert_eq!(results[0], results[1]);
}

#[test]
fn progress_is_monotone_and_ends_at_100() {
    let points = uniform_points(100, 2, 5);
    let mut rng = StdRng::seed_from_u64(5);
    let mut events: Vec<ProgressEvent> = Vec::new();
    {
        let mut reporter = Reporter::new(&mut events, CancelToken::new());
        kmeans(&points, &KMeansConfig::new(3), &mut rng, &mut reporter).unwrap();
    }
    assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
    assert_eq!(events.last().unwrap().percent, 100.0);
}

#[test]
fn k_larger_than_n_is_allowed() {
    let points = vec![vec![0.0], vec![1.0], vec![2.0]];
    let mut rng = StdRng::seed_from_u64(0);
    let mut sink = NullSink;
    let mut reporter = Reporter::new(&mut sink, CancelToken::new());
    let r = kmeans(&points, &KMeansConfig::new(5), &mut rng, &mut reporter).unwrap();
    assert_eq!(r.centroids().len(), 5);
    assert_eq!(r.cluster_counts().iter().sum::<usize>(), 3);
    assert_eq!(r.inertia(), 0.0);
}

#[test]
fn invalid_inputs_are_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut sink = NullSink;
    let mut reporter = Reporter::new(&mut sink, CancelToken::new());

    assert!(matches!(
        kmeans(&[], &KMeansConfig::new(2), &mut rng, &mut reporter),
        Err(ClusterError::EmptyPoints)
    ));
    assert!(matches!(
        kmeans(&[vec![1.0], vec![1.0, 2.0]], &KMeansConfig::new(1), &mut rng, &mut reporter),
        Err(ClusterError::DimensionMismatch { index: 1, .. })
    ));
    assert!(matches!(
        kmeans(&[vec![1.0]], &KMeansConfig::new(1).with_max_iterations(0), &mut rng, &mut reporter),
        Err(ClusterError::InvalidMaxIterations { .. })
    ));
    assert!(matches!(
        kmeans(&[vec![f64::NAN]], &KMeansConfig::new(1), &mut rng, &mut reporter),
        Err(ClusterError::NonFinitePoint { index: 0 })
    ));
}
