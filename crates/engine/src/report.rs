// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summary of a finished run

use crate::admission::AdmissionOutcome;
use crate::monitor::MonitorSummary;
use gk_core::{Entity, EntityId, GateId};
use serde::Serialize;
use std::fmt;

/// Per-gate counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GateTally {
    pub gate: GateId,
    pub admitted: usize,
    pub displaced: usize,
    pub evicted: usize,
    pub abandoned: usize,
    pub polls: u64,
}

/// Returned when a run reaches `Stopped`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub gate_count: usize,
    pub block_size: usize,
    pub admitted: Vec<Entity>,
    pub displaced: Vec<Entity>,
    pub evicted: Vec<EntityId>,
    pub abandoned: Vec<EntityId>,
    pub dropped: Vec<EntityId>,
    /// Occupied gates when the run stopped
    pub final_occupancy: usize,
    pub gates: Vec<GateTally>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub(crate) fn new(
        gate_count: usize,
        block_size: usize,
        mut outcomes: Vec<AdmissionOutcome>,
        monitors: &[MonitorSummary],
        dropped: Vec<EntityId>,
        final_occupancy: usize,
        elapsed_ms: u64,
    ) -> Self {
        outcomes.sort_by_key(|o| o.gate);

        let gates = outcomes
            .iter()
            .map(|o| GateTally {
                gate: o.gate,
                admitted: o.admitted.len(),
                displaced: o.displaced.len(),
                evicted: o.evicted.len(),
                abandoned: o.abandoned.len(),
                polls: monitors
                    .iter()
                    .find(|m| m.gate == o.gate)
                    .map_or(0, |m| m.polls),
            })
            .collect();

        let mut report = Self {
            gate_count,
            block_size,
            admitted: Vec::new(),
            displaced: Vec::new(),
            evicted: Vec::new(),
            abandoned: Vec::new(),
            dropped,
            final_occupancy,
            gates,
            elapsed_ms,
        };
        for outcome in outcomes {
            report.admitted.extend(outcome.admitted);
            report.displaced.extend(outcome.displaced);
            report.evicted.extend(outcome.evicted);
            report.abandoned.extend(outcome.abandoned);
        }
        report
    }

    /// Entities that received an outcome (admitted, displaced, or abandoned)
    pub fn outcome_count(&self) -> usize {
        self.admitted.len() + self.displaced.len() + self.abandoned.len()
    }

    /// Every assigned entity admitted, nothing evicted, registry empty
    pub fn is_clean(&self) -> bool {
        self.displaced.is_empty()
            && self.evicted.is_empty()
            && self.abandoned.is_empty()
            && self.final_occupancy == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Gates: {} (block size {})",
            self.gate_count, self.block_size
        )?;
        writeln!(f, "Admitted: {}", self.admitted.len())?;
        writeln!(f, "Displaced: {}", self.displaced.len())?;
        writeln!(f, "Evicted: {}", self.evicted.len())?;
        if !self.abandoned.is_empty() {
            writeln!(f, "Abandoned: {}", self.abandoned.len())?;
        }
        writeln!(f, "Dropped: {}", self.dropped.len())?;
        for id in &self.dropped {
            writeln!(f, "  - {}", id)?;
        }
        writeln!(f, "Final occupancy: {}", self.final_occupancy)?;
        writeln!(f, "Elapsed: {}ms", self.elapsed_ms)?;
        for tally in &self.gates {
            writeln!(
                f,
                "  {}: admitted={} displaced={} evicted={} polls={}",
                tally.gate, tally.admitted, tally.displaced, tally.evicted, tally.polls
            )?;
        }
        write!(
            f,
            "Status: {}",
            if self.is_clean() { "clean" } else { "anomalies" }
        )
    }
}
