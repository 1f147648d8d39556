// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission worker: drives one gate's block of entities through occupancy
//!
//! For each entity, strictly in block order: occupy the gate, run the
//! admission check, stamp the entity, release the gate. A displaced entity
//! does not stop the block and is not retried.

use crate::check::AdmissionCheck;
use crate::error::AdmissionError;
use crate::signal::AbortSignal;
use gk_core::{Clock, Entity, EntityId, Event, EventSink, GateId, Registry, Release};
use serde::Serialize;
use std::sync::Arc;

/// What one admission worker did with its block
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdmissionOutcome {
    pub gate: GateId,
    /// Admitted and released cleanly, in processing order
    pub admitted: Vec<Entity>,
    /// Stamped, but the release found someone else at the gate
    pub displaced: Vec<Entity>,
    /// Previous occupants overwritten when this worker occupied the gate
    pub evicted: Vec<EntityId>,
    /// Never attempted because the run was aborted
    pub abandoned: Vec<EntityId>,
}

impl AdmissionOutcome {
    fn new(gate: GateId) -> Self {
        Self {
            gate,
            admitted: Vec::new(),
            displaced: Vec::new(),
            evicted: Vec::new(),
            abandoned: Vec::new(),
        }
    }

    /// Entities that went through occupy and release
    pub fn processed(&self) -> usize {
        self.admitted.len() + self.displaced.len()
    }
}

pub struct AdmissionWorker<S, C> {
    gate: GateId,
    block: Vec<Entity>,
    registry: Arc<Registry>,
    check: Arc<dyn AdmissionCheck>,
    sink: Arc<S>,
    clock: C,
    abort: AbortSignal,
}

impl<S: EventSink, C: Clock> AdmissionWorker<S, C> {
    pub fn new(
        gate: GateId,
        block: Vec<Entity>,
        registry: Arc<Registry>,
        check: Arc<dyn AdmissionCheck>,
        sink: Arc<S>,
        clock: C,
    ) -> Self {
        Self {
            gate,
            block,
            registry,
            check,
            sink,
            clock,
            abort: AbortSignal::new(),
        }
    }

    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }

    pub async fn run(self) -> Result<AdmissionOutcome, AdmissionError> {
        let gate = self.gate;
        let mut outcome = AdmissionOutcome::new(gate);
        tracing::debug!(%gate, entities = self.block.len(), "admission worker started");

        let mut block = self.block.into_iter();
        while let Some(entity) = block.next() {
            if self.abort.is_aborted() {
                let skipped = std::iter::once(entity).chain(block.by_ref());
                for entity in skipped {
                    self.sink.emit(Event::EntityAbandoned {
                        gate,
                        entity: entity.id.clone(),
                    });
                    outcome.abandoned.push(entity.id);
                }
                tracing::warn!(%gate, abandoned = outcome.abandoned.len(), "run aborted, abandoning block");
                break;
            }

            Self::admit(
                gate,
                entity,
                &self.registry,
                self.check.as_ref(),
                self.sink.as_ref(),
                &self.clock,
                &mut outcome,
            )
            .await?;
        }

        self.sink.emit(Event::AdmissionWorkerFinished {
            gate,
            processed: outcome.processed(),
        });
        tracing::debug!(
            %gate,
            admitted = outcome.admitted.len(),
            displaced = outcome.displaced.len(),
            "admission worker finished"
        );
        Ok(outcome)
    }

    async fn admit(
        gate: GateId,
        mut entity: Entity,
        registry: &Registry,
        check: &dyn AdmissionCheck,
        sink: &S,
        clock: &C,
        outcome: &mut AdmissionOutcome,
    ) -> Result<(), AdmissionError> {
        let registry_err = |source| AdmissionError::Registry { gate, source };

        let occupancy = registry.try_occupy(gate, &entity.id).map_err(registry_err)?;
        if let Some(previous) = occupancy.previous {
            // Exclusive per-gate blocks mean this should not happen
            tracing::warn!(%gate, evicted = %previous, by = %entity.id, "gate was already occupied");
            sink.emit(Event::GateEvicted {
                gate,
                evicted: previous.clone(),
                by: entity.id.clone(),
            });
            outcome.evicted.push(previous);
        }

        check.check(gate, &entity).await;

        let admitted_at = clock.utc_now();
        if let Err(source) = entity.stamp(gate, admitted_at) {
            registry.release(gate, &entity.id).map_err(registry_err)?;
            return Err(AdmissionError::Invariant { gate, source });
        }

        match registry.release(gate, &entity.id).map_err(registry_err)? {
            Release::Released => {
                sink.emit(Event::EntityAdmitted {
                    gate,
                    entity: entity.id.clone(),
                    admitted_at,
                });
                outcome.admitted.push(entity);
            }
            Release::Rejected { current } => {
                tracing::warn!(
                    %gate,
                    entity = %entity.id,
                    current = ?current,
                    "release rejected, entity was displaced"
                );
                sink.emit(Event::EntityDisplaced {
                    gate,
                    entity: entity.id.clone(),
                    current,
                });
                outcome.displaced.push(entity);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
