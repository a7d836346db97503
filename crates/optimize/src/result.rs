//! Output type shared by all minimizers.

use crate::config::OptimizationMethod;

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    solution: Vec<f64>,
    value: f64,
    iterations: usize,
    converged: bool,
    method: OptimizationMethod,
}

impl OptimizationResult {
    pub(crate) fn new(
        solution: Vec<f64>,
        value: f64,
        iterations: usize,
        converged: bool,
        method: OptimizationMethod,
    ) -> Self {
        Self {
            solution,
            value,
            iterations,
            converged,
            method,
        }
    }

    /// Returns the final parameter vector.
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Returns the objective at [`solution`](Self::solution).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the number of iterations run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the stopping criterion was met before the cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the method that produced this result.
    pub fn method(&self) -> OptimizationMethod {
        self.method
    }

    /// Consumes the result, returning the solution vector.
    pub fn into_solution(self) -> Vec<f64> {
        self.solution
    }
}
