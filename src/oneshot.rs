//! Shared plumbing for the single-request commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, warn};

use marlin_progress::{CancelToken, ProgressEvent, ProgressSink};
use marlin_task::{Message, WireRequest};

use crate::config::MarlinConfig;
use crate::convert;

/// Correlation id used for requests issued from the command line.
const CLI_CORRELATION_ID: &str = "cli";

/// Logs engine progress on stderr.
struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&mut self, event: ProgressEvent) {
        if event.is_failure() {
            warn!(phase = ?event.phase, data = %event.data, "task failed");
        } else {
            info!(percent = event.percent, phase = ?event.phase, "progress");
        }
    }
}

/// Reads and parses a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Builds a command-line request.
pub fn cli_request(task_type: &str, payload: Value, options: Value) -> WireRequest {
    WireRequest::new(task_type, CLI_CORRELATION_ID, payload).with_options(options)
}

/// Runs one request to completion and prints its result as pretty JSON on
/// stdout.
pub fn run(config_path: Option<&Path>, request: WireRequest) -> Result<()> {
    let config = MarlinConfig::load(config_path)?;
    let engine = convert::build_task_engine(&config)?;

    let result = into_result(engine.handle(request, CancelToken::new(), &mut LogSink))?;
    let out = serde_json::to_string_pretty(&result).context("failed to encode result")?;
    println!("{out}");
    Ok(())
}

/// Extracts the result payload from a terminal message.
fn into_result(message: Message) -> Result<Value> {
    match message {
        Message::Result { result, .. } => Ok(result),
        Message::Error { error, .. } => match error.trace {
            Some(trace) => bail!("{}: {} ({trace})", error.kind, error.message),
            None => bail!("{}: {}", error.kind, error.message),
        },
        Message::Progress { .. } => bail!("task ended without a result"),
    }
}
