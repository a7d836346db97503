//! K-means++ centroid seeding.

use marlin_numeric::squared_euclidean;
use rand::Rng;

/// Chooses `k` initial centroids with K-means++.
///
/// 1. The first centroid is a uniformly random input point.
/// 2. Each further centroid is drawn with probability proportional to the
///    squared distance from a point to its nearest chosen centroid.
///
/// When every remaining weight is zero (all points coincide with chosen
/// centroids, e.g. `k > distinct points`) the draw falls back to uniform.
///
/// Caller guarantees `points` is non-empty and `k >= 1`.
pub(crate) fn kmeans_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut impl Rng) -> Vec<Vec<f64>> {
    let n = points.len();
    debug_assert!(n > 0 && k > 0);

    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)].clone());

    // Running minimum squared distance to the chosen set.
    let mut nearest_sq: Vec<f64> = points
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();
    let mut cdf: Vec<f64> = Vec::with_capacity(n);

    while centroids.len() < k {
        let idx = match weighted_index(&nearest_sq, rng, &mut cdf) {
            Some(i) => i,
            None => rng.random_range(0..n),
        };
        let chosen = points[idx].clone();
        for (d, p) in nearest_sq.iter_mut().zip(points.iter()) {
            let candidate = squared_euclidean(p, &chosen);
            if candidate < *d {
                *d = candidate;
            }
        }
        centroids.push(chosen);
    }

    centroids
}

/// Draws one index with probability proportional to `weights`.
///
/// Returns `None` if the weights sum to zero (or are not finite).
/// Zero-weight entries are never selected.
fn weighted_index(weights: &[f64], rng: &mut impl Rng, cdf: &mut Vec<f64>) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }

    cdf.clear();
    let mut acc = 0.0;
    for &w in weights {
        acc += w / total;
        cdf.push(acc);
    }
    // Force the last entry to 1.0 to absorb floating-point drift.
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }

    let u: f64 = rng.random();
    Some(cdf.partition_point(|&c| c <= u).min(weights.len() - 1))
}
