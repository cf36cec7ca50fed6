// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job commands: planning and execution

use super::{parse_time, App};
use crate::output::{self, OutputFormat};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use opscal_core::{
    CommandType, EnvironmentId, Job, JobId, JobPatch, NewJob, ProjectId, Run, UserId,
};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Create a job; with --start it is also placed on the calendar
    Add(AddArgs),
    /// Change a job
    Update(UpdateArgs),
    /// Delete a job, its runs and its calendar entry
    Rm { job: u64 },
    /// Show a job
    Show { job: u64 },
    /// List a project's jobs
    List { project: u64 },
    /// Execute a job now and wait for the run to finish
    Run { job: u64 },
    /// Run history, newest first
    Runs { job: u64 },
}

#[derive(Args)]
pub struct AddArgs {
    pub project: u64,
    pub title: String,
    /// Command line; `mock:<scenario>` replays a canned transcript
    #[arg(long)]
    pub command: Option<String>,
    /// Runs as the command when no command is given
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_enum, default_value_t = CommandKind::Shell)]
    pub command_type: CommandKind,
    /// Environment id; must belong to the same project
    #[arg(long)]
    pub env: Option<u64>,
    /// Target host for ssh jobs
    #[arg(long)]
    pub host: Option<String>,
    /// Remote login for ssh jobs
    #[arg(long)]
    pub user: Option<String>,
    /// Secret-store key of the ssh credential
    #[arg(long)]
    pub credential: Option<String>,
    /// Relative directory inside the checkout
    #[arg(long)]
    pub workdir: Option<String>,
    #[arg(long, value_parser = parse_time)]
    pub start: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_time)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long)]
    pub all_day: bool,
    /// Owning user id
    #[arg(long, default_value_t = 1)]
    pub owner: u64,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub job: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub command: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_enum)]
    pub command_type: Option<CommandKind>,
    #[arg(long, conflicts_with = "no_env")]
    pub env: Option<u64>,
    /// Detach the job from its environment
    #[arg(long)]
    pub no_env: bool,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub credential: Option<String>,
    #[arg(long)]
    pub workdir: Option<String>,
    #[arg(long, value_parser = parse_time)]
    pub start: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_time)]
    pub end: Option<DateTime<Utc>>,
    /// Take the job off the calendar
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub unschedule: bool,
    #[arg(long)]
    pub all_day: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommandKind {
    Shell,
    Ssh,
}

impl From<CommandKind> for CommandType {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Shell => CommandType::Shell,
            CommandKind::Ssh => CommandType::Ssh,
        }
    }
}

impl AddArgs {
    fn into_new_job(self) -> NewJob {
        let mut new = NewJob::new(ProjectId(self.project), self.title, UserId(self.owner))
            .with_schedule(self.start, self.end);
        new.command = self.command.unwrap_or_default();
        new.description = self.description;
        new.command_type = self.command_type.into();
        new.environment_id = self.env.map(EnvironmentId);
        new.target_host = self.host;
        new.target_user = self.user;
        new.credential_key = self.credential;
        new.working_dir = self.workdir;
        new.all_day = self.all_day;
        new
    }
}

impl UpdateArgs {
    fn into_patch(self) -> JobPatch {
        let (planned_start, planned_end) = if self.unschedule {
            (Some(None), Some(None))
        } else {
            (self.start.map(Some), self.end.map(Some))
        };
        JobPatch {
            title: self.title,
            description: self.description.map(Some),
            command: self.command,
            working_dir: self.workdir.map(Some),
            command_type: self.command_type.map(CommandType::from),
            target_host: self.host.map(Some),
            target_user: self.user.map(Some),
            credential_key: self.credential.map(Some),
            environment_id: if self.no_env {
                Some(None)
            } else {
                self.env.map(|id| Some(EnvironmentId(id)))
            },
            planned_start,
            planned_end,
            all_day: self.all_day,
            ..JobPatch::default()
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct JobRow(Job);

impl fmt::Display for JobRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let j = &self.0;
        write!(
            f,
            "{:<6} {:<10} {:<6} {:<22} {}",
            j.id.to_string(),
            j.status.to_string(),
            j.command_type.to_string(),
            output::time(j.planned_start),
            j.title
        )
    }
}

/// Multi-line view for `job show`
#[derive(Serialize)]
#[serde(transparent)]
struct JobDetail(Job);

impl fmt::Display for JobDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let j = &self.0;
        writeln!(f, "Job: {} ({})", j.title, j.id)?;
        writeln!(f, "Project: {}", j.project_id)?;
        writeln!(f, "Status: {}", j.status)?;
        writeln!(f, "Command type: {}", j.command_type)?;
        if let Some(env) = j.environment_id {
            writeln!(f, "Environment: {}", env)?;
        }
        writeln!(f, "Command: {}", j.effective_command())?;
        if let Some(host) = &j.target_host {
            let user = j.target_user.as_deref().unwrap_or("-");
            writeln!(f, "Target: {}@{}", user, host)?;
        }
        if let Some(dir) = &j.working_dir {
            writeln!(f, "Workdir: {}", dir)?;
        }
        // Only the key name; the secret itself never leaves the store
        if let Some(key) = &j.credential_key {
            writeln!(f, "Credential: {}", key)?;
        }
        write!(
            f,
            "Planned: {} .. {}{}",
            output::time(j.planned_start),
            output::time(j.planned_end),
            if j.all_day { " (all day)" } else { "" }
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct RunRow(Run);

impl fmt::Display for RunRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        let exit = r
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{:<6} {:<10} {:<6} {:<22} {}",
            r.id.to_string(),
            r.status.to_string(),
            exit,
            output::time(r.started_at),
            output::time(r.finished_at)
        )
    }
}

/// A finished run with its transcript
#[derive(Serialize)]
#[serde(transparent)]
struct RunDetail(Run);

impl fmt::Display for RunDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        writeln!(f, "Run {} of job {}: {}", r.id, r.job_id, r.status)?;
        if let Some(code) = r.exit_code {
            writeln!(f, "Exit code: {}", code)?;
        }
        writeln!(f, "Started: {}", output::time(r.started_at))?;
        writeln!(f, "Finished: {}", output::time(r.finished_at))?;
        writeln!(f)?;
        write!(f, "{}", r.log.trim_end())
    }
}

pub async fn handle(args: JobArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let planner = app.planner();
    match args.command {
        JobCommand::Add(args) => {
            let job = planner.create_job(args.into_new_job()).await?;
            match format {
                OutputFormat::Text => {
                    println!("Created job {} ({})", job.id, job.title);
                    if job.is_scheduled() {
                        println!("Scheduled at {}", output::time(job.planned_start));
                    }
                }
                OutputFormat::Json => output::print(&JobDetail(job), format),
            }
        }
        JobCommand::Update(args) => {
            let id = JobId(args.job);
            let job = planner.update_job(id, args.into_patch()).await?;
            match format {
                OutputFormat::Text => println!("Updated job {}", job.id),
                OutputFormat::Json => output::print(&JobDetail(job), format),
            }
        }
        JobCommand::Rm { job } => {
            let job = planner.delete_job(JobId(job)).await?;
            match format {
                OutputFormat::Text => println!("Deleted job {} ({})", job.id, job.title),
                OutputFormat::Json => output::print(&JobDetail(job), format),
            }
        }
        JobCommand::Show { job } => {
            output::print(&JobDetail(planner.job(JobId(job))?), format);
        }
        JobCommand::List { project } => {
            let rows: Vec<JobRow> = planner
                .jobs(ProjectId(project))?
                .into_iter()
                .map(JobRow)
                .collect();
            output::print_list(
                &rows,
                &format!(
                    "{:<6} {:<10} {:<6} {:<22} {}",
                    "ID", "STATUS", "TYPE", "PLANNED", "TITLE"
                ),
                "No jobs found.",
                format,
            );
        }
        JobCommand::Run { job } => {
            let run = app.orchestrator().run_to_completion(JobId(job)).await?;
            output::print(&RunDetail(run), format);
        }
        JobCommand::Runs { job } => {
            let rows: Vec<RunRow> = planner
                .runs(JobId(job))?
                .into_iter()
                .map(RunRow)
                .collect();
            output::print_list(
                &rows,
                &format!(
                    "{:<6} {:<10} {:<6} {:<22} {}",
                    "ID", "STATUS", "EXIT", "STARTED", "FINISHED"
                ),
                "No runs found.",
                format,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
