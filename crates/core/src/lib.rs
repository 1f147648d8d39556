// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gk-core: shared state and data types for gatekeeper
//!
//! This crate provides:
//! - The gate occupancy [`Registry`], the one structure workers share
//! - Entities, the gate assignment plan, and the run lifecycle
//! - The event stream a run reports, and sinks to deliver it
//! - Run configuration

pub mod clock;
pub mod id;

pub mod config;
pub mod entity;
pub mod event;
pub mod phase;
pub mod plan;
pub mod registry;
pub mod sink;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, DelayRange, RunConfig};
pub use entity::{Admission, Entity, EntityError};
pub use event::Event;
pub use id::{EntityId, GateId, IdGen, SequentialIdGen, UuidIdGen};
pub use phase::{PhaseError, RunPhase};
pub use plan::{GateBlock, GatePlan, PlanError};
pub use registry::{Occupancy, Registry, RegistryError, Release};
pub use sink::{ChannelSink, EventReceiver, EventSender, EventSink, FanoutSink, TracingSink};

#[cfg(any(test, feature = "test-support"))]
pub use sink::RecordingSink;
