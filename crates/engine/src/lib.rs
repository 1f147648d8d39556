// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Gatekeeper run engine: admission workers, monitors, and the coordinator

mod admission;
mod check;
mod coordinator;
mod error;
mod monitor;
mod report;
mod signal;

pub use admission::{AdmissionOutcome, AdmissionWorker};
pub use check::{AdmissionCheck, SimulatedDelay};
pub use coordinator::Coordinator;
pub use error::{AdmissionError, RunError};
pub use monitor::{MonitorSummary, MonitorWorker};
pub use report::{GateTally, RunReport};
pub use signal::{AbortSignal, MonitorSwitch, MonitorWatch};
