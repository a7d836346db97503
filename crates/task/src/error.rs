//! Protocol-level error kinds and the mapping from engine errors.

use std::fmt;

use marlin_cluster::ClusterError;
use marlin_correlation::CorrelationError;
use marlin_optimize::OptimizeError;
use serde::{Deserialize, Serialize};

/// Category of a failed task, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Empty, malformed, or dimensionally inconsistent payload or options.
    InvalidInput,
    /// Unrecognised task kind.
    UnsupportedOperation,
    /// Unexpected fault during computation.
    ComputationFailure,
    /// The task was cancelled by the host.
    Cancelled,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::ComputationFailure => "ComputationFailure",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed task: kind, human-readable message, optional diagnostic trace.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TaskError {
    kind: ErrorKind,
    message: String,
    trace: Option<String>,
}

impl TaskError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trace: None,
        }
    }

    /// Shorthand for [`ErrorKind::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Shorthand for [`ErrorKind::UnsupportedOperation`].
    pub fn unsupported(task_type: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperation,
            format!("unsupported task type {task_type:?}"),
        )
    }

    /// Shorthand for [`ErrorKind::Cancelled`].
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "task cancelled")
    }

    /// Attaches a diagnostic trace.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the diagnostic trace, if any.
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

impl From<CorrelationError> for TaskError {
    fn from(e: CorrelationError) -> Self {
        match e {
            CorrelationError::Cancelled => Self::cancelled(),
            other => Self::invalid_input(other.to_string()),
        }
    }
}

impl From<ClusterError> for TaskError {
    fn from(e: ClusterError) -> Self {
        match e {
            ClusterError::Cancelled => Self::cancelled(),
            other => Self::invalid_input(other.to_string()),
        }
    }
}

impl From<OptimizeError> for TaskError {
    fn from(e: OptimizeError) -> Self {
        match e {
            OptimizeError::Cancelled => Self::cancelled(),
            OptimizeError::NonFiniteObjective { .. } | OptimizeError::OptimizationFailed { .. } => {
                Self::new(ErrorKind::ComputationFailure, e.to_string())
            }
            other => Self::invalid_input(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = TaskError::invalid_input("k must be >= 1, got 0");
        assert_eq!(e.to_string(), "InvalidInput: k must be >= 1, got 0");
    }

    #[test]
    fn error_unsupported() {
        let e = TaskError::unsupported("FOURIER");
        assert_eq!(e.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(e.message(), "unsupported task type \"FOURIER\"");
    }

    #[test]
    fn error_with_trace() {
        let e = TaskError::new(ErrorKind::ComputationFailure, "panic").with_trace("at line 3");
        assert_eq!(e.trace(), Some("at line 3"));
    }

    #[test]
    fn from_correlation_error() {
        let e: TaskError = CorrelationError::EmptySeriesSet.into();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        assert_eq!(e.message(), "series set is empty");

        let c: TaskError = CorrelationError::Cancelled.into();
        assert_eq!(c.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn from_cluster_error() {
        let e: TaskError = ClusterError::InvalidK { k: 0 }.into();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        let c: TaskError = ClusterError::Cancelled.into();
        assert_eq!(c.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn from_optimize_error() {
        let e: TaskError = OptimizeError::EmptyInitialGuess.into();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        let f: TaskError = OptimizeError::NonFiniteObjective { iteration: 3 }.into();
        assert_eq!(f.kind(), ErrorKind::ComputationFailure);
        let c: TaskError = OptimizeError::Cancelled.into();
        assert_eq!(c.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn error_kind_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::InvalidInput).unwrap(),
            "\"InvalidInput\""
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<TaskError>();
    }
}
