//! Background execution of a walk.
//!
//! [`start_traversal`] moves the walk onto its own thread and hands results
//! back over a channel, so the caller's loop never blocks on the filesystem.
//! The caller drains the channel into its own [`LineSink`] whenever it gets a
//! turn.

use crate::engine::walk_with;
use crate::error::RunError;
use crate::options::{WalkOptions, WalkOptionsBuilder};
use crate::sink::{ChannelSink, FnSink, LineSink, WalkEvent};
use crate::types::{CancelToken, TraversalOutcome};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

const WORKER_NAME: &str = "treelister-walk";

/// One in-flight background walk.
///
/// Dropping the handle cancels the walk.
#[derive(Debug)]
pub struct RunHandle {
    events: Receiver<WalkEvent>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
    outcome: Option<TraversalOutcome>,
}

/// Starts walking `options.root` on a background thread.
///
/// Root validation happens on the worker, so a bad root shows up as a
/// [`WalkEvent::Complete`] carrying [`TraversalOutcome::Failed`].
pub fn start_traversal(options: WalkOptions) -> Result<RunHandle, RunError> {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let worker = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            walk_with(&options, ChannelSink::new(tx), &worker_cancel);
        })
        .map_err(RunError::Spawn)?;
    Ok(RunHandle {
        events: rx,
        cancel,
        worker: Some(worker),
        outcome: None,
    })
}

/// [`start_traversal`] with default options.
pub fn start(root: impl Into<PathBuf>) -> Result<RunHandle, RunError> {
    start_traversal(WalkOptionsBuilder::new(root).build())
}

impl RunHandle {
    /// Asks the walk to stop before its next entry.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Raw event stream, for callers that run their own receive loop.
    pub fn events(&self) -> &Receiver<WalkEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(|w| w.is_finished())
    }

    /// Delivers whatever is queued without blocking.
    ///
    /// Returns `Ok(Some(outcome))` once the completion has been delivered.
    /// Later calls return the same outcome without touching `sink` again.
    pub fn try_drain_into<S: LineSink>(
        &mut self,
        mut sink: S,
    ) -> Result<Option<TraversalOutcome>, RunError> {
        if let Some(outcome) = &self.outcome {
            return Ok(Some(outcome.clone()));
        }
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(outcome) = self.deliver(event, &mut sink) {
                        return Ok(Some(outcome));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(self.disconnected()),
            }
        }
    }

    /// Delivers events until the walk completes.
    pub fn drain_into<S: LineSink>(&mut self, mut sink: S) -> Result<TraversalOutcome, RunError> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        loop {
            let event = match self.events.recv() {
                Ok(event) => event,
                Err(_) => return Err(self.disconnected()),
            };
            if let Some(outcome) = self.deliver(event, &mut sink) {
                return Ok(outcome);
            }
        }
    }

    /// Discards the lines and waits for the outcome and the worker thread.
    pub fn wait(mut self) -> Result<TraversalOutcome, RunError> {
        let outcome = self.drain_into(FnSink(|_: &str| {}))?;
        self.join_worker()?;
        Ok(outcome)
    }

    /// Waits for the worker thread to exit.
    pub fn join(mut self) -> Result<(), RunError> {
        self.join_worker()
    }

    fn deliver<S: LineSink>(&mut self, event: WalkEvent, sink: &mut S) -> Option<TraversalOutcome> {
        match event {
            WalkEvent::Line(line) => {
                sink.on_line(&line);
                None
            }
            WalkEvent::Complete(outcome) => {
                sink.on_complete(&outcome);
                self.outcome = Some(outcome.clone());
                Some(outcome)
            }
        }
    }

    fn disconnected(&mut self) -> RunError {
        match self.join_worker() {
            Err(e) => e,
            Ok(()) => RunError::Disconnected,
        }
    }

    fn join_worker(&mut self) -> Result<(), RunError> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| RunError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        if self.outcome.is_none() {
            self.cancel.cancel();
        }
    }
}
