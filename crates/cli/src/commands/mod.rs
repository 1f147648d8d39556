// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod plan;
pub mod run;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use gk_core::{Entity, EntityId, IdGen, RunConfig, SequentialIdGen, UuidIdGen};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const DEFAULT_ENTITIES: usize = 100;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum IdStyle {
    /// entity-1, entity-2, ...
    #[default]
    Seq,
    /// Random v4 UUIDs
    Uuid,
}

/// Where the batch of entities comes from
#[derive(Args)]
pub struct EntityArgs {
    /// Number of generated entities [default: 100]
    #[arg(short = 'n', long, conflicts_with = "names")]
    pub entities: Option<usize>,

    /// File with one entity id per line
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Id style for generated entities
    #[arg(long, value_enum, default_value_t = IdStyle::Seq)]
    pub id_style: IdStyle,
}

impl EntityArgs {
    pub fn load(&self) -> Result<Vec<Entity>> {
        let ids = match &self.names {
            Some(path) => read_names(path)?,
            None => {
                let count = self.entities.unwrap_or(DEFAULT_ENTITIES);
                match self.id_style {
                    IdStyle::Seq => SequentialIdGen::default().entity_ids(count),
                    IdStyle::Uuid => UuidIdGen.entity_ids(count),
                }
            }
        };
        Ok(ids.into_iter().map(Entity::from).collect())
    }
}

fn read_names(path: &Path) -> Result<Vec<EntityId>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read names from {}", path.display()))?;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for name in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !seen.insert(name) {
            bail!("duplicate entity id in {}: {}", path.display(), name);
        }
        ids.push(EntityId::from(name));
    }
    Ok(ids)
}

/// Run configuration sources; flags override the file
#[derive(Args)]
pub struct ConfigArgs {
    /// TOML file with gate_count, admission_delay, monitor_interval
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of gates
    #[arg(short, long)]
    pub gates: Option<usize>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(gates) = self.gates {
            config.gate_count = gates;
        }
        config.validate()?;
        Ok(config)
    }
}
