// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator: owns one run from partitioning to shutdown
//!
//! Lifecycle is `Idle -> Partitioning -> Running -> Draining -> Stopped`.
//! Monitors are switched off only after every admission worker has been
//! joined, and the run returns only after every monitor has exited.

use crate::admission::{AdmissionOutcome, AdmissionWorker};
use crate::check::{AdmissionCheck, SimulatedDelay};
use crate::error::RunError;
use crate::monitor::{MonitorSummary, MonitorWorker};
use crate::report::RunReport;
use crate::signal::{AbortSignal, MonitorSwitch};
use gk_core::{
    Clock, Entity, EntityId, Event, EventSink, GatePlan, Registry, RunConfig, RunPhase,
};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

pub struct Coordinator<S, C> {
    config: RunConfig,
    sink: Arc<S>,
    clock: C,
    check: Arc<dyn AdmissionCheck>,
    abort: AbortSignal,
    phase: RunPhase,
}

impl<S: EventSink, C: Clock> Coordinator<S, C> {
    pub fn new(config: RunConfig, sink: S, clock: C) -> Self {
        let check = Arc::new(SimulatedDelay::new(config.admission_delay));
        Self {
            config,
            sink: Arc::new(sink),
            clock,
            check,
            abort: AbortSignal::new(),
            phase: RunPhase::Idle,
        }
    }

    /// Replace the simulated admission delay
    pub fn with_check(mut self, check: impl AdmissionCheck) -> Self {
        self.check = Arc::new(check);
        self
    }

    /// Handle that stops admission workers between entities
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub async fn run(mut self, entities: Vec<Entity>) -> Result<RunReport, RunError> {
        self.config.validate()?;
        let started = self.clock.now();

        self.enter(RunPhase::Partitioning)?;
        let plan = GatePlan::build(entities, self.config.gate_count)?;
        let gate_count = plan.gate_count();
        let block_size = plan.block_size();
        tracing::info!(
            gate_count,
            block_size,
            assigned = plan.assigned_count(),
            "partitioned entities"
        );

        let (blocks, dropped) = plan.into_parts();
        let dropped: Vec<EntityId> = dropped.into_iter().map(|e| e.id).collect();
        if !dropped.is_empty() {
            self.sink.emit(Event::PlanDropped {
                count: dropped.len(),
                entities: dropped.clone(),
            });
        }

        let registry = Arc::new(Registry::new(gate_count)?);
        let switch = MonitorSwitch::new();

        self.enter(RunPhase::Running)?;
        let mut monitors = JoinSet::new();
        for gate in registry.gates() {
            let worker = MonitorWorker::new(
                gate,
                Arc::clone(&registry),
                Arc::clone(&self.sink),
                self.config.monitor_interval,
                switch.watch(),
            );
            monitors.spawn(worker.run().instrument(tracing::info_span!("monitor", %gate)));
        }

        let mut admissions = JoinSet::new();
        for block in blocks {
            let gate = block.gate;
            let worker = AdmissionWorker::new(
                gate,
                block.entities,
                Arc::clone(&registry),
                Arc::clone(&self.check),
                Arc::clone(&self.sink),
                self.clock.clone(),
            )
            .with_abort(self.abort.clone());
            admissions.spawn(worker.run().instrument(tracing::info_span!("admission", %gate)));
        }

        let mut failure = None;
        let mut outcomes: Vec<AdmissionOutcome> = Vec::with_capacity(gate_count);
        while let Some(joined) = admissions.join_next().await {
            let err = match joined {
                Ok(Ok(outcome)) => {
                    outcomes.push(outcome);
                    continue;
                }
                Ok(Err(e)) => RunError::from(e),
                Err(e) => panicked("admission", e),
            };
            tracing::error!(error = %err, "admission worker failed, aborting run");
            self.abort.abort();
            failure.get_or_insert(err);
        }

        self.enter(RunPhase::Draining)?;
        if !switch.stop() {
            tracing::error!("monitor switch was already off");
        }

        let mut summaries: Vec<MonitorSummary> = Vec::with_capacity(gate_count);
        while let Some(joined) = monitors.join_next().await {
            let err = match joined {
                Ok(Ok(summary)) => {
                    summaries.push(summary);
                    continue;
                }
                Ok(Err(e)) => RunError::from(e),
                Err(e) => panicked("monitor", e),
            };
            tracing::error!(error = %err, "monitor worker failed");
            failure.get_or_insert(err);
        }

        self.enter(RunPhase::Stopped)?;
        if let Some(err) = failure {
            return Err(err);
        }

        let elapsed = self.clock.now().saturating_duration_since(started);
        let report = RunReport::new(
            gate_count,
            block_size,
            outcomes,
            &summaries,
            dropped,
            registry.count(),
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        );
        if report.final_occupancy != 0 {
            tracing::warn!(
                occupied = report.final_occupancy,
                "registry not empty after drain"
            );
        }
        Ok(report)
    }

    fn enter(&mut self, to: RunPhase) -> Result<(), RunError> {
        self.phase = self.phase.advance(to)?;
        tracing::info!(phase = %self.phase, "run phase");
        self.sink.emit(Event::RunPhase { phase: self.phase });
        Ok(())
    }
}

fn panicked(kind: &'static str, err: JoinError) -> RunError {
    RunError::WorkerPanicked {
        kind,
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
