// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events reported by a run

use crate::id::{EntityId, GateId};
use crate::phase::RunPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a run reports to its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The coordinator moved to a new lifecycle phase
    RunPhase { phase: RunPhase },
    /// Entities left over after equal-sized partitioning
    PlanDropped { count: usize, entities: Vec<EntityId> },

    /// Occupying a gate surfaced a previous occupant, which was evicted
    GateEvicted {
        gate: GateId,
        evicted: EntityId,
        by: EntityId,
    },
    /// The entity was admitted and its gate released cleanly
    EntityAdmitted {
        gate: GateId,
        entity: EntityId,
        admitted_at: DateTime<Utc>,
    },
    /// Release was refused because the gate no longer holds this entity
    EntityDisplaced {
        gate: GateId,
        entity: EntityId,
        /// Actual occupant observed at release time
        current: Option<EntityId>,
    },
    /// The entity was never attempted because the run was aborted
    EntityAbandoned { gate: GateId, entity: EntityId },

    /// A monitor observation
    GateSnapshot {
        gate: GateId,
        occupant: Option<EntityId>,
    },

    AdmissionWorkerFinished { gate: GateId, processed: usize },
    MonitorStopped { gate: GateId, polls: u64 },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::RunPhase { .. } => "run:phase",
            Event::PlanDropped { .. } => "plan:dropped",
            Event::GateEvicted { .. } => "gate:evicted",
            Event::EntityAdmitted { .. } => "entity:admitted",
            Event::EntityDisplaced { .. } => "entity:displaced",
            Event::EntityAbandoned { .. } => "entity:abandoned",
            Event::GateSnapshot { .. } => "gate:snapshot",
            Event::AdmissionWorkerFinished { .. } => "worker:admission:finished",
            Event::MonitorStopped { .. } => "worker:monitor:stopped",
        }
    }

    /// Gate the event concerns, if any
    pub fn gate(&self) -> Option<GateId> {
        match self {
            Event::GateEvicted { gate, .. }
            | Event::EntityAdmitted { gate, .. }
            | Event::EntityDisplaced { gate, .. }
            | Event::EntityAbandoned { gate, .. }
            | Event::GateSnapshot { gate, .. }
            | Event::AdmissionWorkerFinished { gate, .. }
            | Event::MonitorStopped { gate, .. } => Some(*gate),
            Event::RunPhase { .. } | Event::PlanDropped { .. } => None,
        }
    }

    /// The terminal outcome event for a single entity
    pub fn is_entity_outcome(&self) -> bool {
        matches!(
            self,
            Event::EntityAdmitted { .. }
                | Event::EntityDisplaced { .. }
                | Event::EntityAbandoned { .. }
        )
    }

    /// Human-readable one-liner, used by logging sinks
    pub fn log_summary(&self) -> String {
        match self {
            Event::RunPhase { phase } => format!("run entered {}", phase),
            Event::PlanDropped { count, .. } => {
                format!("{} entities did not fit an equal block and were dropped", count)
            }
            Event::GateEvicted { gate, evicted, by } => {
                format!("{} displaced by {} at {}", evicted, by, gate)
            }
            Event::EntityAdmitted { gate, entity, .. } => {
                format!("{} admitted at {}", entity, gate)
            }
            Event::EntityDisplaced {
                gate,
                entity,
                current,
            } => match current {
                Some(current) => format!("{} displaced at {} (held by {})", entity, gate, current),
                None => format!("{} displaced at {} (gate empty)", entity, gate),
            },
            Event::EntityAbandoned { gate, entity } => {
                format!("{} abandoned at {}", entity, gate)
            }
            Event::GateSnapshot { gate, occupant } => match occupant {
                Some(occupant) => format!("{} occupied by {}", gate, occupant),
                None => format!("{} empty", gate),
            },
            Event::AdmissionWorkerFinished { gate, processed } => {
                format!("admission worker for {} finished ({} entities)", gate, processed)
            }
            Event::MonitorStopped { gate, polls } => {
                format!("monitor for {} stopped after {} polls", gate, polls)
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
