//! Configuration for K-means runs.

use crate::error::ClusterError;

/// Configuration for a K-means run.
///
/// # Example
///
/// ```
/// use marlin_cluster::KMeansConfig;
///
/// let config = KMeansConfig::new(4).with_max_iterations(250);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    k: usize,
    max_iterations: usize,
    /// Centroid-shift threshold for convergence.
    tolerance: f64,
    /// Iterations between thread yields.
    yield_every: usize,
}

impl KMeansConfig {
    /// Creates a configuration with the given cluster count.
    ///
    /// Defaults: `max_iterations = 100`, `tolerance = 1e-6`, `yield_every = 10`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 100,
            tolerance: 1e-6,
            yield_every: 10,
        }
    }

    /// Sets the cluster count.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the centroid-shift convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets how many iterations run between yields. Values below 1 become 1.
    pub fn with_yield_every(mut self, yield_every: usize) -> Self {
        self.yield_every = yield_every.max(1);
        self
    }

    /// Returns the cluster count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the yield interval.
    pub fn yield_every(&self) -> usize {
        self.yield_every
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.k < 1 {
            return Err(ClusterError::InvalidK { k: self.k });
        }
        if self.max_iterations < 1 {
            return Err(ClusterError::InvalidMaxIterations {
                max_iterations: self.max_iterations,
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClusterError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::new(3)
    }
}
