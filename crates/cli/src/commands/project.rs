// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project commands

use super::App;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use opscal_core::{Project, UserId};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Add {
        name: String,
        /// Owning user id
        #[arg(long, default_value_t = 1)]
        owner: u64,
    },
    /// List all projects
    List,
}

#[derive(Serialize)]
#[serde(transparent)]
struct ProjectRow(Project);

impl fmt::Display for ProjectRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.0;
        write!(
            f,
            "{:<6} {:<24} {:<10} {}",
            p.id.to_string(),
            p.name,
            format!("{:?}", p.status).to_lowercase(),
            output::time(Some(p.created_at))
        )
    }
}

pub async fn handle(args: ProjectArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let planner = app.planner();
    match args.command {
        ProjectCommand::Add { name, owner } => {
            let project = planner.create_project(&name, UserId(owner))?;
            match format {
                OutputFormat::Text => println!("Created project {} ({})", project.id, project.name),
                OutputFormat::Json => output::print(&ProjectRow(project), format),
            }
        }
        ProjectCommand::List => {
            let rows: Vec<ProjectRow> = planner.projects().into_iter().map(ProjectRow).collect();
            output::print_list(
                &rows,
                &format!("{:<6} {:<24} {:<10} {}", "ID", "NAME", "STATUS", "CREATED"),
                "No projects found.",
                format,
            );
        }
    }
    Ok(())
}
