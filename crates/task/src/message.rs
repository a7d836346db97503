//! Outbound messages: results, errors and progress.

use marlin_progress::{Phase, ProgressEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, TaskError};

/// Error details carried by [`Message::Error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Optional diagnostic detail, e.g. a panic message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl From<&TaskError> for ErrorBody {
    fn from(e: &TaskError) -> Self {
        Self {
            kind: e.kind(),
            message: e.message().to_string(),
            trace: e.trace().map(str::to_string),
        }
    }
}

/// A message sent to the host.
///
/// For one correlation id, zero or more `PROGRESS` messages are followed by
/// exactly one `RESULT` or `ERROR`, which is always last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Successful completion.
    #[serde(rename_all = "camelCase")]
    Result {
        correlation_id: String,
        result: Value,
        success: bool,
    },
    /// Failed completion. No result is sent for the same id.
    #[serde(rename_all = "camelCase")]
    Error {
        correlation_id: String,
        error: ErrorBody,
        success: bool,
    },
    /// Intermediate progress.
    #[serde(rename_all = "camelCase")]
    Progress {
        correlation_id: String,
        percent: f64,
        phase: Phase,
        data: Value,
    },
}

impl Message {
    /// Creates a success message.
    pub fn result(correlation_id: impl Into<String>, result: Value) -> Self {
        Self::Result {
            correlation_id: correlation_id.into(),
            result,
            success: true,
        }
    }

    /// Creates a failure message.
    pub fn error(correlation_id: impl Into<String>, error: &TaskError) -> Self {
        Self::Error {
            correlation_id: correlation_id.into(),
            error: error.into(),
            success: false,
        }
    }

    /// Wraps a progress event.
    pub fn progress(correlation_id: impl Into<String>, event: ProgressEvent) -> Self {
        Self::Progress {
            correlation_id: correlation_id.into(),
            percent: event.percent,
            phase: event.phase,
            data: event.data,
        }
    }

    /// Returns the correlation id this message belongs to.
    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Result { correlation_id, .. }
            | Self::Error { correlation_id, .. }
            | Self::Progress { correlation_id, .. } => correlation_id,
        }
    }

    /// Returns `true` for the final message of a task.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    /// Returns the error kind of an `ERROR` message.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { error, .. } => Some(error.kind),
            _ => None,
        }
    }
}
