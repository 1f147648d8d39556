// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration
//!
//! Loaded from TOML; durations use humantime syntax:
//!
//! ```toml
//! gate_count = 10
//!
//! [admission_delay]
//! min = "5ms"
//! max = "50ms"
//!
//! [monitor_interval]
//! min = "10ms"
//! max = "40ms"
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("gate_count must be at least 1")]
    NoGates,
    #[error("{field}: min ({min:?}) exceeds max ({max:?})")]
    InvertedRange {
        field: &'static str,
        min: Duration,
        max: Duration,
    },
}

/// Inclusive range a random delay is drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    #[serde(with = "humantime_serde")]
    pub min: Duration,
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Always exactly `delay`
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    pub fn zero() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Uniform sample in `[min, max]`.
    ///
    /// An inverted range collapses to `min`.
    pub fn sample(&self, rng: &mut impl Rng) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of gates; one admission and one monitor worker each
    pub gate_count: usize,
    /// Simulated processing time between occupying and releasing a gate
    pub admission_delay: DelayRange,
    /// Pause between monitor polls
    pub monitor_interval: DelayRange,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gate_count: 10,
            admission_delay: DelayRange::new(Duration::from_millis(5), Duration::from_millis(50)),
            monitor_interval: DelayRange::new(
                Duration::from_millis(10),
                Duration::from_millis(40),
            ),
        }
    }
}

impl RunConfig {
    pub fn new(gate_count: usize) -> Self {
        Self {
            gate_count,
            ..Self::default()
        }
    }

    /// Configuration with no artificial delays, for tests
    pub fn immediate(gate_count: usize) -> Self {
        Self {
            gate_count,
            admission_delay: DelayRange::zero(),
            monitor_interval: DelayRange::fixed(Duration::from_millis(1)),
        }
    }

    pub fn with_admission_delay(mut self, delay: DelayRange) -> Self {
        self.admission_delay = delay;
        self
    }

    pub fn with_monitor_interval(mut self, interval: DelayRange) -> Self {
        self.monitor_interval = interval;
        self
    }

    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate_count == 0 {
            return Err(ConfigError::NoGates);
        }
        self.admission_delay.validate("admission_delay")?;
        self.monitor_interval.validate("monitor_interval")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
