// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the gatekeeper engine

use gk_core::{ConfigError, EntityError, GateId, PhaseError, PlanError, RegistryError};
use thiserror::Error;

/// Failure of one admission worker; aborts the run
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("{gate}: registry misuse: {source}")]
    Registry { gate: GateId, source: RegistryError },
    #[error("{gate}: admission invariant violated: {source}")]
    Invariant { gate: GateId, source: EntityError },
}

impl AdmissionError {
    pub fn gate(&self) -> GateId {
        match self {
            AdmissionError::Registry { gate, .. } | AdmissionError::Invariant { gate, .. } => *gate,
        }
    }
}

/// Errors that can end a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("lifecycle error: {0}")]
    Phase(#[from] PhaseError),
    #[error("admission failed: {0}")]
    Admission(#[from] AdmissionError),
    #[error("{kind} worker panicked: {message}")]
    WorkerPanicked { kind: &'static str, message: String },
}
