//! Scalar objective functions.
//!
//! In-process callers wrap any closure with [`Objective::from_fn`]. Requests
//! that cross a serialization boundary describe a closed-form objective with
//! [`ObjectiveSpec`] instead, since code cannot travel in a message.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;

/// Shareable objective `f: R^n -> R`.
#[derive(Clone)]
pub struct Objective {
    f: Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>,
    label: String,
}

impl Objective {
    /// Wraps a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            label: "closure".to_string(),
        }
    }

    /// Evaluates the objective at `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        (self.f)(x)
    }

    /// Short description used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn default_rosenbrock_a() -> f64 {
    1.0
}

fn default_rosenbrock_b() -> f64 {
    100.0
}

/// Serializable description of a closed-form objective.
///
/// Wire form is internally tagged on `kind`:
///
/// ```json
/// {"kind": "sphere"}
/// {"kind": "rosenbrock", "a": 1.0, "b": 100.0}
/// {"kind": "quadratic", "center": [1.0, 2.0], "weights": [1.0, 4.0]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveSpec {
    /// `Σ x_i²`.
    Sphere,
    /// `Σ b·(x_{i+1} − x_i²)² + (a − x_i)²` over consecutive pairs.
    /// With `a = 1` the minimum is `0` at `x = (1, …, 1)`.
    Rosenbrock {
        #[serde(default = "default_rosenbrock_a")]
        a: f64,
        #[serde(default = "default_rosenbrock_b")]
        b: f64,
    },
    /// `Σ w_i·(x_i − c_i)²`. Missing weights default to `1`.
    Quadratic {
        center: Vec<f64>,
        #[serde(default)]
        weights: Vec<f64>,
    },
}

impl ObjectiveSpec {
    /// Short name of the objective family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Rosenbrock { .. } => "rosenbrock",
            Self::Quadratic { .. } => "quadratic",
        }
    }

    /// Builds an [`Objective`] for inputs of dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidObjective`] when the description does
    /// not fit `dim` (Rosenbrock needs at least two coordinates, quadratic
    /// centre and weights must have length `dim`) or holds non-finite
    /// parameters.
    pub fn build(&self, dim: usize) -> Result<Objective, OptimizeError> {
        match self {
            Self::Sphere => Ok(Objective::from_fn(sphere).labelled("sphere")),
            Self::Rosenbrock { a, b } => {
                if dim < 2 {
                    return Err(invalid(format!(
                        "rosenbrock needs at least 2 dimensions, got {dim}"
                    )));
                }
                if !(a.is_finite() && b.is_finite()) {
                    return Err(invalid("rosenbrock parameters must be finite".to_string()));
                }
                let (a, b) = (*a, *b);
                Ok(Objective::from_fn(move |x| rosenbrock(x, a, b))
                    .labelled(format!("rosenbrock(a={a}, b={b})")))
            }
            Self::Quadratic { center, weights } => {
                if center.len() != dim {
                    return Err(invalid(format!(
                        "quadratic center has {} coordinates, expected {dim}",
                        center.len()
                    )));
                }
                let weights = if weights.is_empty() {
                    vec![1.0; dim]
                } else if weights.len() == dim {
                    weights.clone()
                } else {
                    return Err(invalid(format!(
                        "quadratic weights have {} entries, expected {dim}",
                        weights.len()
                    )));
                };
                if center.iter().chain(weights.iter()).any(|v| !v.is_finite()) {
                    return Err(invalid("quadratic parameters must be finite".to_string()));
                }
                let center = center.clone();
                Ok(Objective::from_fn(move |x| {
                    x.iter()
                        .zip(center.iter())
                        .zip(weights.iter())
                        .map(|((xi, ci), wi)| wi * (xi - ci) * (xi - ci))
                        .sum()
                })
                .labelled("quadratic"))
            }
        }
    }
}

fn invalid(reason: String) -> OptimizeError {
    OptimizeError::InvalidObjective { reason }
}

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn rosenbrock(x: &[f64], a: f64, b: f64) -> f64 {
    x.windows(2)
        .map(|w| {
            let (xi, xn) = (w[0], w[1]);
            b * (xn - xi * xi).powi(2) + (a - xi).powi(2)
        })
        .sum()
}
