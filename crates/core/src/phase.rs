// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run lifecycle state machine
//!
//! `Idle -> Partitioning -> Running -> Draining -> Stopped`. Every step is
//! taken in order; `Stopped` is terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("invalid run transition: {from} -> {to}")]
    InvalidTransition { from: RunPhase, to: RunPhase },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Partitioning,
    /// Admission and monitor workers are active
    Running,
    /// Admission workers finished, monitors told to stop
    Draining,
    Stopped,
}

impl RunPhase {
    /// The only phase reachable from this one
    pub fn next(self) -> Option<RunPhase> {
        match self {
            RunPhase::Idle => Some(RunPhase::Partitioning),
            RunPhase::Partitioning => Some(RunPhase::Running),
            RunPhase::Running => Some(RunPhase::Draining),
            RunPhase::Draining => Some(RunPhase::Stopped),
            RunPhase::Stopped => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == RunPhase::Stopped
    }

    pub fn advance(self, to: RunPhase) -> Result<RunPhase, PhaseError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(PhaseError::InvalidTransition { from: self, to })
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Partitioning => "partitioning",
            RunPhase::Running => "running",
            RunPhase::Draining => "draining",
            RunPhase::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
