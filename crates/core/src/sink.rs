// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event sinks: where a run delivers what it observes
//!
//! The host decides where events go. Sinks are shared by every worker, so
//! `emit` takes `&self` and must not block for long.

use crate::event::Event;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sender half handed to a [`ChannelSink`]
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver half kept by the host
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Injected reporting channel
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: Event);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: Event) {
        (**self).emit(event)
    }
}

/// Logs each event through `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        let name = event.name();
        let summary = event.log_summary();
        match &event {
            Event::GateEvicted { .. } | Event::EntityDisplaced { .. } => {
                tracing::warn!(event = name, gate = ?event.gate(), "{}", summary)
            }
            Event::PlanDropped { .. } | Event::EntityAbandoned { .. } => {
                tracing::warn!(event = name, "{}", summary)
            }
            Event::GateSnapshot { .. } => tracing::debug!(event = name, "{}", summary),
            _ => tracing::info!(event = name, "{}", summary),
        }
    }
}

/// Forwards events into an unbounded channel
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: EventSender,
}

impl ChannelSink {
    pub fn new() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

/// Delivers every event to each inner sink, in order
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: impl EventSink) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: Event) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingSink;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::EventSink;
    use crate::event::Event;
    use std::sync::{Arc, Mutex};

    /// Keeps every event in emission order for assertions
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<Event> {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        /// Events whose `name()` equals `name`
        pub fn named(&self, name: &str) -> Vec<Event> {
            self.events()
                .into_iter()
                .filter(|e| e.name() == name)
                .collect()
        }

        pub fn len(&self) -> usize {
            self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: Event) {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
