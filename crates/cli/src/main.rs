// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gk - gatekeeper admission runner

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{plan, run};

#[derive(Parser)]
#[command(
    name = "gk",
    version,
    about = "gk admits entities through a fixed set of gates, one occupant at a time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Admit a batch of entities and print the run report
    Run(run::RunArgs),
    /// Show how entities would be partitioned across gates
    Plan(plan::PlanArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Plan(args) => plan::plan(args),
    }
}

/// Log to stderr so stdout stays clean for reports
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
