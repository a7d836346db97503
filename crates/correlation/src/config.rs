//! Configuration for correlation matrix computation.

use std::fmt;
use std::str::FromStr;

use crate::error::CorrelationError;

/// Correlation estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrelationMethod {
    /// Pearson product-moment correlation.
    #[default]
    Pearson,
}

impl CorrelationMethod {
    /// Returns the wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelationMethod {
    type Err = CorrelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            other => Err(CorrelationError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Configuration for a correlation matrix request.
///
/// # Example
///
/// ```
/// use marlin_correlation::CorrelationConfig;
///
/// let config = CorrelationConfig::new()
///     .with_min_periods(60)
///     .with_pairwise(false);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    method: CorrelationMethod,
    /// Pairwise deletion when `true`, listwise deletion when `false`.
    pairwise: bool,
    /// Minimum overlapping samples for a defined correlation.
    min_periods: usize,
}

impl CorrelationConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `method = Pearson`, `pairwise = true`, `min_periods = 30`.
    pub fn new() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            pairwise: true,
            min_periods: 30,
        }
    }

    /// Sets the correlation method.
    pub fn with_method(mut self, method: CorrelationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets pairwise (`true`) or listwise (`false`) handling of absent values.
    pub fn with_pairwise(mut self, pairwise: bool) -> Self {
        self.pairwise = pairwise;
        self
    }

    /// Sets the minimum number of overlapping samples.
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Returns the correlation method.
    pub fn method(&self) -> CorrelationMethod {
        self.method
    }

    /// Returns `true` for pairwise deletion.
    pub fn pairwise(&self) -> bool {
        self.pairwise
    }

    /// Returns the minimum number of overlapping samples.
    pub fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), CorrelationError> {
        if self.min_periods < 1 {
            return Err(CorrelationError::InvalidMinPeriods {
                min_periods: self.min_periods,
            });
        }
        Ok(())
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self::new()
    }
}
