//! Dedicated worker thread that runs tasks sequentially.
//!
//! ```text
//!  host ──submit──▶ [job queue] ──▶ worker thread ──▶ TaskEngine
//!   ▲                                    │
//!   └───────────── [message queue] ◀─────┘  PROGRESS* then RESULT | ERROR
//! ```
//!
//! Cancellation tokens are registered at submit time, so a task can be
//! cancelled while still queued.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use marlin_progress::{CancelToken, ProgressEvent, ProgressSink};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::engine::TaskEngine;
use crate::error::{ErrorKind, TaskError};
use crate::message::Message;
use crate::request::TaskRequest;
use crate::wire::WireRequest;

type TokenMap = Arc<Mutex<HashMap<String, CancelToken>>>;

enum Job {
    Wire(WireRequest),
    Typed(TaskRequest),
}

impl Job {
    fn correlation_id(&self) -> &str {
        match self {
            Self::Wire(w) => &w.correlation_id,
            Self::Typed(t) => &t.correlation_id,
        }
    }
}

/// Forwards engine progress onto the message queue, tagged with the task id.
struct MessageSink<'a> {
    correlation_id: &'a str,
    out: &'a Sender<Message>,
}

impl ProgressSink for MessageSink<'_> {
    fn emit(&mut self, event: ProgressEvent) {
        if self.out.send(Message::progress(self.correlation_id, event)).is_err() {
            trace!("message receiver dropped, progress discarded");
        }
    }
}

/// Handle to a running worker thread.
///
/// Dropping the handle cancels queued and running tasks, closes the queue
/// and joins the thread. Use [`finish`](Self::finish) to let queued tasks
/// complete instead.
pub struct Worker {
    jobs: Option<Sender<Job>>,
    messages: Receiver<Message>,
    tokens: TokenMap,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Moves `engine` onto a new thread and starts processing.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(engine: TaskEngine) -> std::io::Result<Self> {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (msg_tx, msg_rx) = unbounded::<Message>();
        let tokens: TokenMap = Arc::new(Mutex::new(HashMap::new()));

        let thread_tokens = Arc::clone(&tokens);
        let handle = thread::Builder::new()
            .name("marlin-worker".to_string())
            .spawn(move || run_loop(&engine, &job_rx, &msg_tx, &thread_tokens))?;

        Ok(Self {
            jobs: Some(job_tx),
            messages: msg_rx,
            tokens,
            handle: Some(handle),
        })
    }

    /// Queues a wire request.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error if a task with the same correlation id
    /// is still queued or running, or a `ComputationFailure` error if the
    /// worker has stopped.
    pub fn submit(&self, request: WireRequest) -> Result<(), TaskError> {
        self.enqueue(Job::Wire(request))
    }

    /// Queues a typed request, e.g. one carrying an in-process closure.
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit).
    pub fn submit_task(&self, request: TaskRequest) -> Result<(), TaskError> {
        self.enqueue(Job::Typed(request))
    }

    fn enqueue(&self, job: Job) -> Result<(), TaskError> {
        let id = job.correlation_id().to_string();
        match self.tokens.lock().entry(id.clone()) {
            Entry::Occupied(_) => {
                return Err(TaskError::invalid_input(format!(
                    "a task with correlation id {id:?} is already pending"
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(CancelToken::new());
            }
        }
        let sent = match &self.jobs {
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        };
        if sent {
            debug!(correlation_id = %id, "task queued");
            Ok(())
        } else {
            self.tokens.lock().remove(&id);
            Err(TaskError::new(ErrorKind::ComputationFailure, "worker has stopped"))
        }
    }

    /// Requests cancellation of a queued or running task.
    ///
    /// Returns `false` if no task with that id is pending.
    pub fn cancel(&self, correlation_id: &str) -> bool {
        match self.tokens.lock().get(correlation_id) {
            Some(token) => {
                token.cancel();
                debug!(correlation_id, "cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Returns a receiver for outbound messages.
    ///
    /// The channel closes once the worker thread exits.
    pub fn messages(&self) -> Receiver<Message> {
        self.messages.clone()
    }

    /// Blocks until the next message. Returns `None` once the worker has
    /// exited and every message has been drained.
    pub fn recv(&self) -> Option<Message> {
        self.messages.recv().ok()
    }

    /// Closes the queue, lets queued tasks finish and joins the thread.
    pub fn finish(mut self) {
        self.close(false);
    }

    fn close(&mut self, cancel_pending: bool) {
        if cancel_pending {
            for token in self.tokens.lock().values() {
                token.cancel();
            }
        }
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.close(true);
    }
}

fn run_loop(engine: &TaskEngine, jobs: &Receiver<Job>, out: &Sender<Message>, tokens: &TokenMap) {
    debug!("worker started");
    for job in jobs {
        let id = job.correlation_id().to_string();
        let cancel = tokens.lock().get(&id).cloned().unwrap_or_default();
        let mut sink = MessageSink {
            correlation_id: &id,
            out,
        };
        let message = match job {
            Job::Wire(w) => engine.handle(w, cancel, &mut sink),
            Job::Typed(t) => engine.execute(t, cancel, &mut sink),
        };
        tokens.lock().remove(&id);
        if out.send(message).is_err() {
            debug!("message receiver dropped, stopping worker");
            break;
        }
    }
    debug!("worker stopped");
}
