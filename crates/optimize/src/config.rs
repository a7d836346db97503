//! Solver configurations and method selection.

use std::fmt;
use std::str::FromStr;

use marlin_numeric::DEFAULT_GRADIENT_STEP;

use crate::error::OptimizeError;

/// Configuration for fixed-step gradient descent.
///
/// # Example
///
/// ```
/// use marlin_optimize::GradientDescentConfig;
///
/// let config = GradientDescentConfig::new()
///     .with_learning_rate(0.05)
///     .with_max_iterations(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescentConfig {
    learning_rate: f64,
    max_iterations: usize,
    /// Gradient-norm threshold for convergence.
    tolerance: f64,
    /// Finite-difference half-width.
    step: f64,
    /// Iterations between progress events and yields.
    report_every: usize,
}

impl GradientDescentConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: `learning_rate = 0.01`, `max_iterations = 1000`,
    /// `tolerance = 1e-6`, `step = 1e-8`, `report_every = 50`.
    pub fn new() -> Self {
        Self {
            learning_rate: 0.01,
            max_iterations: 1000,
            tolerance: 1e-6,
            step: DEFAULT_GRADIENT_STEP,
            report_every: 50,
        }
    }

    /// Sets the fixed learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the gradient-norm convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the finite-difference step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the progress interval. Values below 1 become 1.
    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every.max(1);
        self
    }

    /// Returns the learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the finite-difference step.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the progress interval.
    pub fn report_every(&self) -> usize {
        self.report_every
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(OptimizeError::InvalidLearningRate {
                learning_rate: self.learning_rate,
            });
        }
        if self.max_iterations < 1 {
            return Err(OptimizeError::InvalidMaxIterations {
                max_iterations: self.max_iterations,
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OptimizeError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(OptimizeError::InvalidStep { step: self.step });
        }
        Ok(())
    }
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for Nelder-Mead simplex search.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    max_iterations: usize,
    /// Standard deviation of simplex costs below which the search stops.
    sd_tolerance: f64,
    /// Offset of each initial simplex vertex from the initial guess.
    initial_step: f64,
}

impl NelderMeadConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: `max_iterations = 1000`, `sd_tolerance = 1e-8`,
    /// `initial_step = 0.5`.
    pub fn new() -> Self {
        Self {
            max_iterations: 1000,
            sd_tolerance: 1e-8,
            initial_step: 0.5,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the simplex standard-deviation tolerance.
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Sets the initial simplex size.
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the simplex standard-deviation tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Returns the initial simplex size.
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.max_iterations < 1 {
            return Err(OptimizeError::InvalidMaxIterations {
                max_iterations: self.max_iterations,
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance < 0.0 {
            return Err(OptimizeError::InvalidTolerance {
                tolerance: self.sd_tolerance,
            });
        }
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(OptimizeError::InvalidStep {
                step: self.initial_step,
            });
        }
        Ok(())
    }
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationMethod {
    /// Fixed-step gradient descent with finite-difference gradients.
    #[default]
    GradientDescent,
    /// Derivative-free simplex search.
    NelderMead,
}

impl OptimizationMethod {
    /// Returns the canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GradientDescent => "gradient_descent",
            Self::NelderMead => "nelder_mead",
        }
    }
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationMethod {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "gradient_descent" | "gd" => Ok(Self::GradientDescent),
            "nelder_mead" | "nm" => Ok(Self::NelderMead),
            _ => Err(OptimizeError::UnknownMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Method together with its solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerConfig {
    /// Run gradient descent.
    GradientDescent(GradientDescentConfig),
    /// Run Nelder-Mead.
    NelderMead(NelderMeadConfig),
}

impl OptimizerConfig {
    /// Returns the selected method.
    pub fn method(&self) -> OptimizationMethod {
        match self {
            Self::GradientDescent(_) => OptimizationMethod::GradientDescent,
            Self::NelderMead(_) => OptimizationMethod::NelderMead,
        }
    }

    /// Validates the inner configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        match self {
            Self::GradientDescent(c) => c.validate(),
            Self::NelderMead(c) => c.validate(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::GradientDescent(GradientDescentConfig::default())
    }
}
