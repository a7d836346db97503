//! Stateless numeric primitives shared by the Marlin engines.
//!
//! | Function | Used by |
//! |----------|---------|
//! | [`pearson`] | correlation matrix |
//! | [`euclidean`], [`squared_euclidean`] | K-means assignment, inertia, silhouette |
//! | [`numerical_gradient`], [`l2_norm`] | gradient-descent optimizer |
//!
//! Nothing here allocates shared state or logs; every function is pure.

/// Default finite-difference step for [`numerical_gradient`].
pub const DEFAULT_GRADIENT_STEP: f64 = 1e-8;

/// Pearson correlation coefficient of two equal-length samples.
///
/// ```text
/// r = (nΣxy − ΣxΣy) / sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²))
/// ```
///
/// Evaluated in centred (two-pass) form, which is algebraically identical
/// but loses less precision on large-magnitude prices.
///
/// Returns `0.0` when the lengths differ, the input is empty, or either
/// sample has zero variance. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }

    (sum_xy / denom).clamp(-1.0, 1.0)
}

/// Squared Euclidean distance between two points of equal dimension.
///
/// # Panics
///
/// Debug-asserts that `a.len() == b.len()`. Callers guarantee equal
/// dimensionality.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let d = ai - bi;
            d * d
        })
        .sum()
}

/// Euclidean distance between two points of equal dimension.
///
/// # Panics
///
/// Debug-asserts that `a.len() == b.len()`.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// L2 norm of a vector.
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Central-difference gradient of `f` at `x`.
///
/// For each dimension `i`:
/// ```text
/// g[i] = (f(x + h·eᵢ) − f(x − h·eᵢ)) / 2h
/// ```
///
/// # Cost
///
/// Every call performs `2 · x.len()` objective evaluations. For the
/// gradient-descent optimizer this dominates runtime: an `n`-iteration run
/// over a `d`-dimensional problem costs `2·d·n` evaluations of `f`.
pub fn numerical_gradient<F>(f: F, x: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut probe = x.to_vec();
    let mut grad = Vec::with_capacity(x.len());
    let two_h = 2.0 * h;

    for i in 0..x.len() {
        let xi = probe[i];
        probe[i] = xi + h;
        let f_plus = f(&probe);
        probe[i] = xi - h;
        let f_minus = f(&probe);
        probe[i] = xi;
        grad.push((f_plus - f_minus) / two_h);
    }

    grad
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [-1.0, -2.0, -3.0, -4.0, -5.0];
        assert_relative_eq!(pearson(&x, &y), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_hand_computed() {
        // x = [1,2,3,4], y = [2,1,4,3]
        // n=4, Σx=10, Σy=10, Σxy=28, Σx²=30, Σy²=30
        // r = (112 - 100) / sqrt((120 - 100)(120 - 100)) = 12/20 = 0.6
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 1.0, 4.0, 3.0];
        assert_relative_eq!(pearson(&x, &y), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_length_mismatch() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_pearson_empty() {
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn test_pearson_zero_variance() {
        let x = [5.0, 5.0, 5.0, 5.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(pearson(&x, &y), 0.0);
        assert_eq!(pearson(&y, &x), 0.0);
    }

    #[test]
    fn test_pearson_single_sample() {
        // One sample has no variance.
        assert_eq!(pearson(&[3.0], &[7.0]), 0.0);
    }

    #[test]
    fn test_pearson_symmetric() {
        let x = [0.3, -1.2, 4.4, 2.0, 0.0, 1.1];
        let y = [1.0, 0.5, 2.2, 1.9, -0.4, 0.3];
        assert_eq!(pearson(&x, &y), pearson(&y, &x));
    }

    #[test]
    fn test_pearson_large_offset() {
        // Prices around 1e6 must still correlate perfectly.
        let x: Vec<f64> = (0..50).map(|i| 1e6 + i as f64 * 0.01).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_euclidean_3_4_5() {
        assert_abs_diff_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_euclidean_zero() {
        let p = [1.5, -2.0, 7.25];
        assert_eq!(euclidean(&p, &p), 0.0);
    }

    #[test]
    fn test_l2_norm() {
        assert_abs_diff_eq!(l2_norm(&[3.0, 4.0]), 5.0, epsilon = 1e-12);
        assert_eq!(l2_norm(&[]), 0.0);
    }

    #[test]
    fn test_gradient_sphere() {
        // f(x) = Σ xᵢ², ∇f = 2x
        let f = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
        let g = numerical_gradient(f, &[1.0, -2.0, 3.0], 1e-5);
        assert_abs_diff_eq!(g[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g[1], -4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g[2], 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_default_step() {
        let f = |x: &[f64]| 3.0 * x[0] + x[1] * x[1];
        let g = numerical_gradient(f, &[10.0, 1.0], DEFAULT_GRADIENT_STEP);
        assert_abs_diff_eq!(g[0], 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(g[1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_gradient_evaluation_count() {
        use std::cell::Cell;
        let calls = Cell::new(0usize);
        let f = |x: &[f64]| {
            calls.set(calls.get() + 1);
            x.iter().sum::<f64>()
        };
        let _ = numerical_gradient(f, &[0.0; 7], 1e-6);
        assert_eq!(calls.get(), 14);
    }

    #[test]
    fn test_gradient_does_not_mutate_input() {
        let x = vec![0.5, 0.25];
        let _ = numerical_gradient(|v: &[f64]| v[0] * v[1], &x, 1e-6);
        assert_eq!(x, vec![0.5, 0.25]);
    }

    #[test]
    fn test_gradient_empty() {
        let g = numerical_gradient(|_: &[f64]| 1.0, &[], 1e-6);
        assert!(g.is_empty());
    }
}
