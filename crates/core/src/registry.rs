// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate occupancy registry
//!
//! The only state shared between workers. Every gate has its own slot lock,
//! so operations on one gate are linearizable and operations on different
//! gates never contend. No lock is held across an `.await` or returned to
//! the caller.

use crate::id::{EntityId, GateId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry needs at least one gate")]
    NoGates,
    #[error("{gate} out of range (registry has {gate_count} gates)")]
    GateOutOfRange { gate: GateId, gate_count: usize },
}

/// Result of installing an occupant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupancy {
    /// Entity that held the gate before the install, now evicted
    pub previous: Option<EntityId>,
}

impl Occupancy {
    pub fn was_occupied(&self) -> bool {
        self.previous.is_some()
    }
}

/// Result of a conditional release
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Release {
    /// The expected entity was the occupant and has been removed
    Released,
    /// The gate holds someone else (or nobody); nothing was removed
    Rejected { current: Option<EntityId> },
}

impl Release {
    pub fn removed(&self) -> bool {
        matches!(self, Release::Released)
    }
}

/// Thread-safe mapping from gate to its current occupant
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Mutex<Option<EntityId>>>,
    occupied: AtomicUsize,
}

impl Registry {
    pub fn new(gate_count: usize) -> Result<Self, RegistryError> {
        if gate_count == 0 {
            return Err(RegistryError::NoGates);
        }
        Ok(Self {
            slots: (0..gate_count).map(|_| Mutex::new(None)).collect(),
            occupied: AtomicUsize::new(0),
        })
    }

    pub fn gate_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate every gate id of this registry
    pub fn gates(&self) -> impl Iterator<Item = GateId> {
        (0..self.slots.len()).map(GateId)
    }

    fn slot(&self, gate: GateId) -> Result<MutexGuard<'_, Option<EntityId>>, RegistryError> {
        let slot = self
            .slots
            .get(gate.index())
            .ok_or(RegistryError::GateOutOfRange {
                gate,
                gate_count: self.slots.len(),
            })?;
        Ok(slot.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Install `entity` as the occupant of `gate`, returning whoever was there.
    ///
    /// Read and write happen under one slot lock; last writer wins.
    pub fn try_occupy(&self, gate: GateId, entity: &EntityId) -> Result<Occupancy, RegistryError> {
        let mut slot = self.slot(gate)?;
        let previous = slot.replace(entity.clone());
        if previous.is_none() {
            self.occupied.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Occupancy { previous })
    }

    /// Remove the occupant of `gate` only if it is `expected`.
    pub fn release(&self, gate: GateId, expected: &EntityId) -> Result<Release, RegistryError> {
        let mut slot = self.slot(gate)?;
        if slot.as_ref() == Some(expected) {
            *slot = None;
            self.occupied.fetch_sub(1, Ordering::SeqCst);
            Ok(Release::Released)
        } else {
            Ok(Release::Rejected {
                current: slot.clone(),
            })
        }
    }

    /// Current occupant of `gate`, if any
    pub fn try_read(&self, gate: GateId) -> Result<Option<EntityId>, RegistryError> {
        Ok(self.slot(gate)?.clone())
    }

    /// Number of occupied gates
    pub fn count(&self) -> usize {
        self.occupied.load(Ordering::SeqCst)
    }

    /// Per-gate view, each gate read under its own lock
    pub fn snapshot(&self) -> Vec<(GateId, Option<EntityId>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let occupant = slot.lock().unwrap_or_else(|e| e.into_inner()).clone();
                (GateId(i), occupant)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
