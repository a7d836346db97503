//! Serve command: JSON-lines requests on stdin, JSON-lines messages on stdout.
//!
//! Each input line is a request object, or `{"type": "CANCEL",
//! "correlationId": "..."}` to cancel a queued or running task. Lines that
//! cannot be read as a request are answered with an `InvalidInput` error
//! carrying whatever correlation id could be recovered. On end of input the
//! queue is drained before exiting.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info, info_span};

use marlin_task::{Message, TaskError, WireRequest, Worker};

use crate::config::MarlinConfig;
use crate::convert;

/// Control message type that cancels a task instead of submitting one.
const CANCEL_TYPE: &str = "CANCEL";

/// What one input line asks for.
#[derive(Debug, PartialEq)]
enum Line {
    Submit(WireRequest),
    Cancel(String),
    Reject(Message),
}

/// Run the JSON-lines loop until stdin closes.
pub fn run(config: Option<&Path>) -> Result<()> {
    let _cmd = info_span!("serve").entered();
    let cfg = MarlinConfig::load(config)?;
    let engine = convert::build_task_engine(&cfg)?;
    let worker = Worker::spawn(engine).context("failed to start worker thread")?;

    let messages = worker.messages();
    let printer = thread::Builder::new()
        .name("marlin-output".to_string())
        .spawn(move || -> Result<()> {
            for message in messages {
                write_message(&message)?;
            }
            Ok(())
        })
        .context("failed to start output thread")?;

    info!("serving requests on stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Line::Submit(request) => {
                let id = request.correlation_id.clone();
                if let Err(e) = worker.submit(request) {
                    write_message(&Message::error(id, &e))?;
                }
            }
            Line::Cancel(id) => {
                if !worker.cancel(&id) {
                    debug!(correlation_id = %id, "cancel for unknown or finished task");
                }
            }
            Line::Reject(message) => write_message(&message)?,
        }
    }

    info!("input closed, draining queue");
    worker.finish();
    match printer.join() {
        Ok(result) => result,
        Err(_) => bail!("output thread panicked"),
    }
}

fn parse_line(line: &str) -> Line {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Line::Reject(Message::error(
                "",
                &TaskError::invalid_input(format!("invalid JSON request: {e}")),
            ));
        }
    };

    let id = value
        .get("correlationId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if value.get("type").and_then(Value::as_str) == Some(CANCEL_TYPE) {
        return Line::Cancel(id);
    }

    match serde_json::from_value::<WireRequest>(value) {
        Ok(request) => Line::Submit(request),
        Err(e) => Line::Reject(Message::error(
            id,
            &TaskError::invalid_input(format!("invalid request: {e}")),
        )),
    }
}

/// Writes one message as a single line on stdout.
fn write_message(message: &Message) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, message).context("failed to encode message")?;
    writeln!(out).context("failed to write stdout")?;
    out.flush().context("failed to flush stdout")
}
