// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission checks run while an entity holds its gate
//!
//! The check is the worker's one voluntary suspension point. It runs
//! between occupy and release and never holds a registry lock, so monitors
//! can observe the occupant while it runs.

use async_trait::async_trait;
use gk_core::{DelayRange, Entity, GateId};
use std::time::Duration;

/// Work performed for an entity while it occupies a gate
#[async_trait]
pub trait AdmissionCheck: Send + Sync + 'static {
    async fn check(&self, gate: GateId, entity: &Entity);
}

/// Stand-in for a real admission-control check: sleeps a random delay
#[derive(Clone, Copy, Debug)]
pub struct SimulatedDelay {
    range: DelayRange,
}

impl SimulatedDelay {
    pub fn new(range: DelayRange) -> Self {
        Self { range }
    }
}

#[async_trait]
impl AdmissionCheck for SimulatedDelay {
    async fn check(&self, gate: GateId, entity: &Entity) {
        let delay = self.range.sample(&mut rand::thread_rng());
        let delay_us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        tracing::trace!(%gate, entity = %entity.id, delay_us, "processing");
        if delay == Duration::ZERO {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
