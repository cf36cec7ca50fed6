// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment environments of a project

use super::App;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand, ValueEnum};
use opscal_core::{Environment, EnvironmentType, ProjectId};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

#[derive(Subcommand)]
pub enum EnvCommand {
    /// Create an environment jobs can target with --env
    Add {
        project: u64,
        name: String,
        #[arg(long, value_enum, default_value_t = EnvKind::Other)]
        kind: EnvKind,
    },
    /// List a project's environments
    List { project: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvKind {
    Dev,
    Test,
    Staging,
    Prod,
    Other,
}

impl From<EnvKind> for EnvironmentType {
    fn from(kind: EnvKind) -> Self {
        match kind {
            EnvKind::Dev => EnvironmentType::Dev,
            EnvKind::Test => EnvironmentType::Test,
            EnvKind::Staging => EnvironmentType::Staging,
            EnvKind::Prod => EnvironmentType::Prod,
            EnvKind::Other => EnvironmentType::Other,
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct EnvRow(Environment);

impl fmt::Display for EnvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.0;
        write!(
            f,
            "{:<6} {:<20} {}",
            e.id.to_string(),
            e.name,
            format!("{:?}", e.kind).to_lowercase()
        )
    }
}

pub async fn handle(args: EnvArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let planner = app.planner();
    match args.command {
        EnvCommand::Add {
            project,
            name,
            kind,
        } => {
            let env = planner.create_environment(ProjectId(project), &name, kind.into())?;
            match format {
                OutputFormat::Text => {
                    println!("Created environment {} ({}) in project {}", env.id, env.name, project)
                }
                OutputFormat::Json => output::print(&EnvRow(env), format),
            }
        }
        EnvCommand::List { project } => {
            let rows: Vec<EnvRow> = planner
                .environments(ProjectId(project))?
                .into_iter()
                .map(EnvRow)
                .collect();
            output::print_list(
                &rows,
                &format!("{:<6} {:<20} {}", "ID", "NAME", "KIND"),
                "No environments found.",
                format,
            );
        }
    }
    Ok(())
}
