// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate assignment plan
//!
//! Splits the entity sequence into `gate_count` contiguous blocks of
//! `len / gate_count` entities each. Entities past `gate_count * block_size`
//! do not fit any block and are kept aside as dropped so the caller can
//! report them.

use crate::entity::Entity;
use crate::id::GateId;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("cannot partition entities across zero gates")]
    NoGates,
}

/// The entities assigned to one gate, in input order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GateBlock {
    pub gate: GateId,
    pub entities: Vec<Entity>,
}

/// Deterministic partition of entities across gates
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GatePlan {
    block_size: usize,
    blocks: Vec<GateBlock>,
    dropped: Vec<Entity>,
}

impl GatePlan {
    pub fn build(entities: Vec<Entity>, gate_count: usize) -> Result<Self, PlanError> {
        if gate_count == 0 {
            return Err(PlanError::NoGates);
        }

        let block_size = entities.len() / gate_count;
        let mut remaining = entities.into_iter();
        let blocks = (0..gate_count)
            .map(|g| GateBlock {
                gate: GateId(g),
                entities: remaining.by_ref().take(block_size).collect(),
            })
            .collect();
        let dropped = remaining.collect();

        Ok(Self {
            block_size,
            blocks,
            dropped,
        })
    }

    pub fn gate_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn blocks(&self) -> &[GateBlock] {
        &self.blocks
    }

    /// Entities that did not fit an equal-sized block
    pub fn dropped(&self) -> &[Entity] {
        &self.dropped
    }

    pub fn assigned_count(&self) -> usize {
        self.block_size * self.blocks.len()
    }

    /// Hand each block to its worker
    pub fn into_parts(self) -> (Vec<GateBlock>, Vec<Entity>) {
        (self.blocks, self.dropped)
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
