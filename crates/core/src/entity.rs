// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entities being admitted through gates
//!
//! An entity is created unassigned, handed to exactly one admission worker,
//! and stamped once when that worker admits it. The admission timestamp and
//! gate are write-once.

use crate::id::{EntityId, GateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity {entity} already admitted at {gate} ({at}); refusing second stamp for {attempted}")]
    AlreadyStamped {
        entity: EntityId,
        gate: GateId,
        at: DateTime<Utc>,
        attempted: GateId,
    },
}

/// Admission record, present once the entity has been stamped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub gate: GateId,
    pub at: DateTime<Utc>,
}

/// Something being admitted into the facility
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    admission: Option<Admission>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            admission: None,
        }
    }

    /// Record the gate and time of admission.
    ///
    /// Fails if the entity was already stamped; the existing record is kept.
    pub fn stamp(&mut self, gate: GateId, at: DateTime<Utc>) -> Result<(), EntityError> {
        if let Some(existing) = self.admission {
            return Err(EntityError::AlreadyStamped {
                entity: self.id.clone(),
                gate: existing.gate,
                at: existing.at,
                attempted: gate,
            });
        }
        self.admission = Some(Admission { gate, at });
        Ok(())
    }

    pub fn admission(&self) -> Option<Admission> {
        self.admission
    }

    pub fn admitted_at(&self) -> Option<DateTime<Utc>> {
        self.admission.map(|a| a.at)
    }

    pub fn gate(&self) -> Option<GateId> {
        self.admission.map(|a| a.gate)
    }

    pub fn is_admitted(&self) -> bool {
        self.admission.is_some()
    }
}

impl From<EntityId> for Entity {
    fn from(id: EntityId) -> Self {
        Entity::new(id)
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
