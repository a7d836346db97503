//! Mean silhouette coefficient.

use marlin_numeric::euclidean;
use rayon::prelude::*;

/// Mean silhouette coefficient over all points.
///
/// For point `i` in cluster `A`:
/// ```text
/// a(i) = mean distance to the other members of A
/// b(i) = min over non-empty clusters B ≠ A of mean distance to members of B
/// s(i) = (b − a) / max(a, b)
/// ```
///
/// Conventions: a point alone in its cluster has `s = 0`; `s = 0` when
/// `max(a, b) = 0`; the overall score is `0` when fewer than two clusters
/// are non-empty. Cost is `O(n²·d)`, parallelised over points.
pub(crate) fn silhouette_score(
    points: &[Vec<f64>],
    assignments: &[usize],
    counts: &[usize],
) -> f64 {
    let n = points.len();
    let k = counts.len();
    if n == 0 || counts.iter().filter(|&&c| c > 0).count() < 2 {
        return 0.0;
    }

    // Collected before summing so the result does not depend on thread splits.
    let scores: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            let own = assignments[i];
            if counts[own] <= 1 {
                return 0.0;
            }

            let mut sums = vec![0.0; k];
            for (j, q) in points.iter().enumerate() {
                if j != i {
                    sums[assignments[j]] += euclidean(&points[i], q);
                }
            }

            let a = sums[own] / (counts[own] - 1) as f64;
            let b = (0..k)
                .filter(|&c| c != own && counts[c] > 0)
                .map(|c| sums[c] / counts[c] as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            if denom > 0.0 { (b - a) / denom } else { 0.0 }
        })
        .collect();

    scores.iter().sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hand_computed_1d() {
        // Clusters {0, 1} and {10}.
        // p0: a = 1, b = 10 → 0.9
        // p1: a = 1, b = 9  → 8/9
        // p2: singleton → 0
        let points = vec![vec![0.0], vec![1.0], vec![10.0]];
        let s = silhouette_score(&points, &[0, 0, 1], &[2, 1]);
        assert_abs_diff_eq!(s, (0.9 + 8.0 / 9.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_cluster_is_zero() {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&points, &[0, 0, 0], &[3]), 0.0);
        // An empty second cluster does not count.
        assert_eq!(silhouette_score(&points, &[0, 0, 0], &[3, 0]), 0.0);
    }

    #[test]
    fn test_well_separated_near_one() {
        let mut points = Vec::new();
        let mut assignments = Vec::new();
        for i in 0..10 {
            points.push(vec![i as f64 * 0.01]);
            assignments.push(0);
            points.push(vec![1000.0 + i as f64 * 0.01]);
            assignments.push(1);
        }
        let s = silhouette_score(&points, &assignments, &[10, 10]);
        assert!(s > 0.99, "s = {s}");
    }

    #[test]
    fn test_coincident_points_zero() {
        // All distances zero: max(a, b) = 0 → s = 0.
        let points = vec![vec![1.0]; 4];
        assert_eq!(silhouette_score(&points, &[0, 0, 1, 1], &[2, 2]), 0.0);
    }
}
