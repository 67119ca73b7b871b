//! Receivers for walk results.
//!
//! A [`LineSink`] gets one `on_line` call per visited path, in depth-first
//! pre-order, followed by exactly one `on_complete` call.

use crate::types::TraversalOutcome;
use std::sync::mpsc::Sender;

pub trait LineSink {
    fn on_line(&mut self, line: &str);

    fn on_complete(&mut self, _outcome: &TraversalOutcome) {}
}

impl LineSink for Vec<String> {
    fn on_line(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn on_line(&mut self, line: &str) {
        (**self).on_line(line);
    }

    fn on_complete(&mut self, outcome: &TraversalOutcome) {
        (**self).on_complete(outcome);
    }
}

/// Adapts a closure into a sink. The completion is ignored.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&str)> LineSink for FnSink<F> {
    fn on_line(&mut self, line: &str) {
        (self.0)(line);
    }
}

/// One message from a background walk to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    Line(String),
    Complete(TraversalOutcome),
}

/// Forwards everything into a channel. Sends to a dropped receiver are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<WalkEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<WalkEvent>) -> Self {
        Self { tx }
    }
}

impl LineSink for ChannelSink {
    fn on_line(&mut self, line: &str) {
        let _ = self.tx.send(WalkEvent::Line(line.to_owned()));
    }

    fn on_complete(&mut self, outcome: &TraversalOutcome) {
        let _ = self.tx.send(WalkEvent::Complete(outcome.clone()));
    }
}
