//! Output type for K-means runs.

use crate::error::ClusterError;
use crate::kmeans::nearest_centroid;

/// Result of a K-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    centroids: Vec<Vec<f64>>,
    assignments: Vec<usize>,
    iterations: usize,
    converged: bool,
    inertia: f64,
    silhouette_score: f64,
    cluster_counts: Vec<usize>,
}

impl KMeansResult {
    /// Assembles a result from a finished run.
    pub(crate) fn new(
        centroids: Vec<Vec<f64>>,
        assignments: Vec<usize>,
        iterations: usize,
        converged: bool,
        inertia: f64,
        silhouette_score: f64,
        cluster_counts: Vec<usize>,
    ) -> Self {
        Self {
            centroids,
            assignments,
            iterations,
            converged,
            inertia,
            silhouette_score,
            cluster_counts,
        }
    }

    /// Returns the `k` final centroids.
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Returns the cluster index of each input point.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Returns the number of iterations run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the run converged before the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the within-cluster sum of squared distances.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the mean silhouette coefficient in `[-1, 1]`.
    pub fn silhouette_score(&self) -> f64 {
        self.silhouette_score
    }

    /// Returns the number of points in each cluster.
    pub fn cluster_counts(&self) -> &[usize] {
        &self.cluster_counts
    }

    /// Returns the number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Assigns a new point to its nearest centroid.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::DimensionMismatch`] (with `index = 0`) if the
    /// point's dimension differs from the centroids', or
    /// [`ClusterError::NonFinitePoint`] if it contains NaN or infinity.
    pub fn predict(&self, point: &[f64]) -> Result<usize, ClusterError> {
        let expected = self.centroids.first().map_or(0, Vec::len);
        if point.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                index: 0,
                expected,
                got: point.len(),
            });
        }
        if point.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::NonFinitePoint { index: 0 });
        }
        Ok(nearest_centroid(point, &self.centroids))
    }
}
