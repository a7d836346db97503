//! Lloyd iteration with K-means++ seeding.

use marlin_numeric::{euclidean, squared_euclidean};
use marlin_progress::{Phase, Reporter};
use rand::Rng;
use serde_json::json;
use tracing::{debug, trace};

use crate::config::KMeansConfig;
use crate::error::ClusterError;
use crate::result::KMeansResult;
use crate::seed::kmeans_plus_plus;
use crate::silhouette::silhouette_score;

/// Placeholder assignment before the first pass; never a valid cluster.
const UNASSIGNED: usize = usize::MAX;

/// Transient state of one clustering request.
struct ClusteringRun<'a> {
    points: &'a [Vec<f64>],
    centroids: Vec<Vec<f64>>,
    assignments: Vec<usize>,
    iteration: usize,
    converged: bool,
}

impl<'a> ClusteringRun<'a> {
    fn new(points: &'a [Vec<f64>], centroids: Vec<Vec<f64>>) -> Self {
        Self {
            points,
            centroids,
            assignments: vec![UNASSIGNED; points.len()],
            iteration: 0,
            converged: false,
        }
    }

    /// Assignment step. Returns how many points changed cluster.
    fn assign(&mut self) -> usize {
        let mut changed = 0;
        for (p, slot) in self.points.iter().zip(self.assignments.iter_mut()) {
            let c = nearest_centroid(p, &self.centroids);
            if c != *slot {
                *slot = c;
                changed += 1;
            }
        }
        changed
    }

    /// Update step. Returns the largest centroid shift.
    fn update(&mut self) -> f64 {
        let previous = self.centroids.clone();
        update_centroids(self.points, &self.assignments, &mut self.centroids);
        previous
            .iter()
            .zip(self.centroids.iter())
            .map(|(a, b)| euclidean(a, b))
            .fold(0.0, f64::max)
    }

    fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &a in &self.assignments {
            counts[a] += 1;
        }
        counts
    }

    fn inertia(&self) -> f64 {
        self.points
            .iter()
            .zip(self.assignments.iter())
            .map(|(p, &c)| squared_euclidean(p, &self.centroids[c]))
            .sum()
    }
}

/// Index of the centroid nearest to `point`.
///
/// Ties resolve to the lowest index (strict `<` during the scan).
pub(crate) fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, centroid);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

/// Moves each centroid to the mean of its assigned points.
///
/// A centroid with no assigned points keeps its coordinates.
pub(crate) fn update_centroids(points: &[Vec<f64>], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    let dim = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (p, &a) in points.iter().zip(assignments.iter()) {
        counts[a] += 1;
        for (s, &v) in sums[a].iter_mut().zip(p.iter()) {
            *s += v;
        }
    }

    for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(counts.iter()) {
        if count == 0 {
            continue;
        }
        let inv = 1.0 / count as f64;
        for (c, s) in centroid.iter_mut().zip(sum) {
            *c = s * inv;
        }
    }
}

/// Validates points and returns their common dimension.
fn validate_points(points: &[Vec<f64>]) -> Result<usize, ClusterError> {
    let first = points.first().ok_or(ClusterError::EmptyPoints)?;
    let dim = first.len();
    if dim == 0 {
        return Err(ClusterError::ZeroDimension);
    }
    for (index, p) in points.iter().enumerate() {
        if p.len() != dim {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected: dim,
                got: p.len(),
            });
        }
        if p.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::NonFinitePoint { index });
        }
    }
    Ok(dim)
}

/// Clusters `points` into `config.k()` groups.
///
/// Seeds with K-means++, then alternates assignment and update steps until
/// no assignment changes, every centroid moves less than
/// `config.tolerance()`, or `config.max_iterations()` is reached.
///
/// One progress event is emitted per iteration plus a final 100% event.
/// The run yields every `config.yield_every()` iterations and checks for
/// cancellation every iteration. On failure a `-1` event is emitted.
///
/// # Errors
///
/// Returns [`ClusterError`] for invalid configuration, empty or
/// inconsistent points, or cancellation.
#[tracing::instrument(skip(points, config, rng, reporter), fields(n_points = points.len(), k = config.k()))]
pub fn kmeans(
    points: &[Vec<f64>],
    config: &KMeansConfig,
    rng: &mut impl Rng,
    reporter: &mut Reporter<'_>,
) -> Result<KMeansResult, ClusterError> {
    match kmeans_inner(points, config, rng, reporter) {
        Ok(result) => Ok(result),
        Err(e) => {
            reporter.fail(Phase::Clustering, json!({ "error": e.to_string() }));
            Err(e)
        }
    }
}

fn kmeans_inner(
    points: &[Vec<f64>],
    config: &KMeansConfig,
    rng: &mut impl Rng,
    reporter: &mut Reporter<'_>,
) -> Result<KMeansResult, ClusterError> {
    config.validate()?;
    let dim = validate_points(points)?;

    let seeds = kmeans_plus_plus(points, config.k(), rng);
    let mut run = ClusteringRun::new(points, seeds);
    let max_iterations = config.max_iterations();

    while !run.converged && run.iteration < max_iterations {
        run.iteration += 1;
        let changed = run.assign();
        let max_shift = run.update();
        run.converged = changed == 0 || max_shift < config.tolerance();

        trace!(iteration = run.iteration, changed, max_shift, "kmeans iteration");
        reporter.report(
            run.iteration as f64 / max_iterations as f64 * 100.0,
            Phase::Clustering,
            json!({
                "iteration": run.iteration,
                "maxIterations": max_iterations,
                "changed": changed,
                "maxShift": max_shift,
            }),
        );

        if run.iteration % config.yield_every() == 0 {
            reporter.checkpoint()?;
        } else {
            reporter.check_cancelled()?;
        }
    }

    let counts = run.counts();
    let inertia = run.inertia();
    let silhouette = silhouette_score(points, &run.assignments, &counts);

    debug!(
        dim,
        iterations = run.iteration,
        converged = run.converged,
        inertia,
        silhouette,
        "kmeans complete"
    );
    reporter.report(
        100.0,
        Phase::Clustering,
        json!({
            "iterations": run.iteration,
            "converged": run.converged,
            "inertia": inertia,
        }),
    );

    Ok(KMeansResult::new(
        run.centroids,
        run.assignments,
        run.iteration,
        run.converged,
        inertia,
        silhouette,
        counts,
    ))
}
