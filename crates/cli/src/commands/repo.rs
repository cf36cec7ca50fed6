// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository commands

use super::App;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use opscal_core::{GitRepo, ProjectId};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub command: RepoCommand,
}

#[derive(Subcommand)]
pub enum RepoCommand {
    /// Attach a git repository to a project. Runs check out the first one.
    Add {
        project: u64,
        name: String,
        url: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },
    /// List a project's repositories
    List { project: u64 },
}

#[derive(Serialize)]
#[serde(transparent)]
struct RepoRow(GitRepo);

impl fmt::Display for RepoRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        write!(f, "{:<6} {:<20} {:<12} {}", r.id.to_string(), r.name, r.default_branch, r.url)
    }
}

pub async fn handle(args: RepoArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let planner = app.planner();
    match args.command {
        RepoCommand::Add {
            project,
            name,
            url,
            branch,
        } => {
            let repo = planner.add_repo(ProjectId(project), &name, &url, Some(&branch))?;
            match format {
                OutputFormat::Text => {
                    println!("Attached repo {} ({}) to project {}", repo.id, repo.name, project)
                }
                OutputFormat::Json => output::print(&RepoRow(repo), format),
            }
        }
        RepoCommand::List { project } => {
            let rows: Vec<RepoRow> = planner
                .repos(ProjectId(project))?
                .into_iter()
                .map(RepoRow)
                .collect();
            output::print_list(
                &rows,
                &format!("{:<6} {:<20} {:<12} {}", "ID", "NAME", "BRANCH", "URL"),
                "No repos found.",
                format,
            );
        }
    }
    Ok(())
}
