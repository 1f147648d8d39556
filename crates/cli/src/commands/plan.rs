// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gk plan` - Show the gate partition without running it

use super::{ConfigArgs, EntityArgs};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use gk_core::{EntityId, GateId, GatePlan};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub entities: EntityArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct PlanView {
    gate_count: usize,
    block_size: usize,
    gates: Vec<GateView>,
    dropped: Vec<EntityId>,
}

#[derive(Serialize)]
struct GateView {
    gate: GateId,
    entities: Vec<EntityId>,
}

impl From<GatePlan> for PlanView {
    fn from(plan: GatePlan) -> Self {
        let gate_count = plan.gate_count();
        let block_size = plan.block_size();
        let (blocks, dropped) = plan.into_parts();
        Self {
            gate_count,
            block_size,
            gates: blocks
                .into_iter()
                .map(|b| GateView {
                    gate: b.gate,
                    entities: b.entities.into_iter().map(|e| e.id).collect(),
                })
                .collect(),
            dropped: dropped.into_iter().map(|e| e.id).collect(),
        }
    }
}

impl fmt::Display for PlanView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Gates: {} (block size {})",
            self.gate_count, self.block_size
        )?;
        for gate in &self.gates {
            let names: Vec<&str> = gate.entities.iter().map(EntityId::as_str).collect();
            writeln!(f, "  {}: {}", gate.gate, names.join(", "))?;
        }
        write!(f, "Dropped: {}", self.dropped.len())?;
        for id in &self.dropped {
            write!(f, "\n  - {}", id)?;
        }
        Ok(())
    }
}

pub fn plan(args: PlanArgs) -> Result<()> {
    let config = args.config.load()?;
    let entities = args.entities.load()?;
    let plan = GatePlan::build(entities, config.gate_count)?;
    output::print(&PlanView::from(plan), args.format)
}
