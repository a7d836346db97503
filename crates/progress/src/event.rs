//! Progress event payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved `percent` value signalling that a run failed.
pub const FAILED_PERCENT: f64 = -1.0;

/// Tag identifying which engine stage produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Pairwise correlation matrix computation.
    Correlation,
    /// K-means seeding and iteration.
    Clustering,
    /// Objective minimisation.
    Optimization,
}

/// A single progress update.
///
/// `percent` is in `0..=100`, or exactly [`FAILED_PERCENT`] for failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Completion percentage, or `-1` on failure.
    pub percent: f64,
    /// Producing stage.
    pub phase: Phase,
    /// Stage-specific metadata.
    pub data: Value,
}

impl ProgressEvent {
    /// Creates a new event.
    pub fn new(percent: f64, phase: Phase, data: Value) -> Self {
        Self {
            percent,
            phase,
            data,
        }
    }

    /// Creates a failure event.
    pub fn failed(phase: Phase, data: Value) -> Self {
        Self::new(FAILED_PERCENT, phase, data)
    }

    /// Returns `true` if this is the failure sentinel.
    pub fn is_failure(&self) -> bool {
        self.percent == FAILED_PERCENT
    }
}
