//! Error type for cooperative cancellation.

/// Returned from [`Reporter::checkpoint`](crate::Reporter::checkpoint) once
/// the task's [`CancelToken`](crate::CancelToken) has been triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task cancelled")]
pub struct Cancelled;
