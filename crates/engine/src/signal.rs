// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shutdown signals passed explicitly into workers
//!
//! [`MonitorSwitch`] carries the "monitoring active" flag: it starts on and
//! is switched off exactly once, after every admission worker has returned.
//! [`AbortSignal`] lets admission workers abandon the rest of their block,
//! checked only between entities.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Owner side of the monitoring flag
#[derive(Debug)]
pub struct MonitorSwitch {
    tx: watch::Sender<bool>,
}

impl MonitorSwitch {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx }
    }

    /// Receiver handed to one monitor worker
    pub fn watch(&self) -> MonitorWatch {
        MonitorWatch {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_active(&self) -> bool {
        *self.tx.borrow()
    }

    /// Turn monitoring off. Returns false if it was already off.
    pub fn stop(&self) -> bool {
        self.tx.send_if_modified(|active| {
            let was_active = *active;
            *active = false;
            was_active
        })
    }
}

impl Default for MonitorSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Monitor side of the monitoring flag
#[derive(Clone, Debug)]
pub struct MonitorWatch {
    rx: watch::Receiver<bool>,
}

impl MonitorWatch {
    /// False once switched off, or once the switch is gone
    pub fn is_active(&self) -> bool {
        *self.rx.borrow() && self.rx.has_changed().is_ok()
    }

    /// Resolves when monitoring is switched off or the switch is dropped
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|active| !*active).await;
    }
}

/// Shared request to stop admission workers between entities
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. Returns true for the first caller only.
    pub fn abort(&self) -> bool {
        !self.aborted.swap(true, Ordering::SeqCst)
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
