// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gk run` - Admit a batch of entities through the gates

use super::{ConfigArgs, EntityArgs};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use gk_core::{SystemClock, TracingSink};
use gk_engine::Coordinator;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub entities: EntityArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = args.config.load()?;
    let entities = args.entities.load()?;
    tracing::info!(
        gates = config.gate_count,
        entities = entities.len(),
        "starting run"
    );

    let coordinator = Coordinator::new(config, TracingSink, SystemClock);
    let abort = coordinator.abort_signal();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && abort.abort() {
            tracing::warn!("interrupted, finishing in-flight admissions");
        }
    });

    let result = coordinator.run(entities).await;
    interrupt.abort();

    let report = result?;
    output::print(&report, args.format)
}
