// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor worker: polls one gate's occupancy until monitoring is switched off
//!
//! Monitors only read the registry. The flag is checked at the top of each
//! iteration; a pending pause is cut short when the switch flips, but a read
//! in progress always completes.

use crate::signal::MonitorWatch;
use gk_core::{DelayRange, Event, EventSink, GateId, Registry, RegistryError};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonitorSummary {
    pub gate: GateId,
    pub polls: u64,
}

pub struct MonitorWorker<S> {
    gate: GateId,
    registry: Arc<Registry>,
    sink: Arc<S>,
    interval: DelayRange,
    watch: MonitorWatch,
}

impl<S: EventSink> MonitorWorker<S> {
    pub fn new(
        gate: GateId,
        registry: Arc<Registry>,
        sink: Arc<S>,
        interval: DelayRange,
        watch: MonitorWatch,
    ) -> Self {
        Self {
            gate,
            registry,
            sink,
            interval,
            watch,
        }
    }

    pub async fn run(mut self) -> Result<MonitorSummary, RegistryError> {
        let gate = self.gate;
        let mut polls = 0u64;

        while self.watch.is_active() {
            let occupant = self.registry.try_read(gate)?;
            self.sink.emit(Event::GateSnapshot { gate, occupant });
            polls += 1;

            let pause = self.interval.sample(&mut rand::thread_rng());
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = self.watch.stopped() => {}
            }
        }

        self.sink.emit(Event::MonitorStopped { gate, polls });
        tracing::debug!(%gate, polls, "monitor stopped");
        Ok(MonitorSummary { gate, polls })
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
