// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobs: schedulable, executable units of work owned by a project

use crate::execution::PlanError;
use crate::id::{EnvironmentId, JobId, ProjectId, UserId};
use crate::run::RunStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Command run when a job has neither a command nor a description
pub const FALLBACK_COMMAND: &str = "echo 'No command specified'";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Dev,
    Ops,
    Maintenance,
    Meeting,
    Infra,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobType::Dev => "dev",
            JobType::Ops => "ops",
            JobType::Maintenance => "maintenance",
            JobType::Meeting => "meeting",
            JobType::Infra => "infra",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Planned,
    Running,
    Success,
    Failed,
    Canceled,
}

/// A job mirrors the status of its latest run
impl From<RunStatus> for JobStatus {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Queued | RunStatus::Running => JobStatus::Running,
            RunStatus::Success => JobStatus::Success,
            RunStatus::Failed => JobStatus::Failed,
            RunStatus::Canceled => JobStatus::Canceled,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Draft => "draft",
            JobStatus::Planned => "planned",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

/// How a job's command is delivered to its target
///
/// Records written by a newer build may carry a type this build does not
/// know; those deserialize to `Unsupported` and fail at plan resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    #[default]
    Shell,
    Ssh,
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandType::Shell => "shell",
            CommandType::Ssh => "ssh",
            CommandType::Unsupported => "unsupported",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CommandType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shell" => Ok(CommandType::Shell),
            "ssh" => Ok(CommandType::Ssh),
            other => Err(PlanError::UnsupportedCommandType(other.to_string())),
        }
    }
}

/// A job record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub environment_id: Option<EnvironmentId>,

    pub title: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Script, playbook or command line to run
    #[serde(default)]
    pub command: String,
    /// Relative override joined onto the resolved working directory
    #[serde(default)]
    pub working_dir: Option<String>,
    #[serde(default)]
    pub command_type: CommandType,
    #[serde(default)]
    pub target_host: Option<String>,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub credential_key: Option<String>,

    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub priority: JobPriority,

    pub owner_id: UserId,
    #[serde(default)]
    pub requested_by_id: Option<UserId>,

    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// The command line that actually runs: the command, else the
    /// description, else a placeholder echo.
    pub fn effective_command(&self) -> &str {
        if !self.command.trim().is_empty() {
            return &self.command;
        }
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => FALLBACK_COMMAND,
        }
    }

    /// Whether this job belongs on the calendar
    pub fn is_scheduled(&self) -> bool {
        self.planned_start.is_some()
    }
}

/// Input for creating a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub project_id: ProjectId,
    pub title: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub environment_id: Option<EnvironmentId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub working_dir: Option<String>,
    #[serde(default)]
    pub command_type: CommandType,
    #[serde(default)]
    pub target_host: Option<String>,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub credential_key: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewJob {
    pub fn new(project_id: ProjectId, title: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            project_id,
            title: title.into(),
            owner_id,
            environment_id: None,
            description: None,
            command: String::new(),
            working_dir: None,
            command_type: CommandType::Shell,
            target_host: None,
            target_user: None,
            credential_key: None,
            job_type: JobType::default(),
            priority: JobPriority::default(),
            planned_start: None,
            planned_end: None,
            all_day: false,
            tags: Vec::new(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_schedule(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.planned_start = start;
        self.planned_end = end;
        self
    }

    /// Materialize the record. The creator is recorded as requester.
    pub fn into_job(self, id: JobId, now: DateTime<Utc>) -> Job {
        Job {
            id,
            project_id: self.project_id,
            environment_id: self.environment_id,
            title: self.title,
            description: self.description,
            command: self.command,
            working_dir: self.working_dir,
            command_type: self.command_type,
            target_host: self.target_host,
            target_user: self.target_user,
            credential_key: self.credential_key,
            job_type: self.job_type,
            status: JobStatus::Draft,
            priority: self.priority,
            owner_id: self.owner_id,
            requested_by_id: Some(self.owner_id),
            planned_start: self.planned_start,
            planned_end: self.planned_end,
            all_day: self.all_day,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a job. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub command: Option<String>,
    pub working_dir: Option<Option<String>>,
    pub command_type: Option<CommandType>,
    pub target_host: Option<Option<String>>,
    pub target_user: Option<Option<String>>,
    pub credential_key: Option<Option<String>>,
    pub environment_id: Option<Option<EnvironmentId>>,
    pub job_type: Option<JobType>,
    pub priority: Option<JobPriority>,
    pub status: Option<JobStatus>,
    pub planned_start: Option<Option<DateTime<Utc>>>,
    pub planned_end: Option<Option<DateTime<Utc>>>,
    pub all_day: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl JobPatch {
    /// Apply to `job`. Returns true when a field mirrored onto the calendar
    /// (title, schedule window, all-day flag) was touched.
    pub fn apply(self, job: &mut Job, now: DateTime<Utc>) -> bool {
        let mirrored = self.title.is_some()
            || self.planned_start.is_some()
            || self.planned_end.is_some()
            || self.all_day.is_some();

        if let Some(v) = self.title {
            job.title = v;
        }
        if let Some(v) = self.description {
            job.description = v;
        }
        if let Some(v) = self.command {
            job.command = v;
        }
        if let Some(v) = self.working_dir {
            job.working_dir = v;
        }
        if let Some(v) = self.command_type {
            job.command_type = v;
        }
        if let Some(v) = self.target_host {
            job.target_host = v;
        }
        if let Some(v) = self.target_user {
            job.target_user = v;
        }
        if let Some(v) = self.credential_key {
            job.credential_key = v;
        }
        if let Some(v) = self.environment_id {
            job.environment_id = v;
        }
        if let Some(v) = self.job_type {
            job.job_type = v;
        }
        if let Some(v) = self.priority {
            job.priority = v;
        }
        if let Some(v) = self.status {
            job.status = v;
        }
        if let Some(v) = self.planned_start {
            job.planned_start = v;
        }
        if let Some(v) = self.planned_end {
            job.planned_end = v;
        }
        if let Some(v) = self.all_day {
            job.all_day = v;
        }
        if let Some(v) = self.tags {
            job.tags = v;
        }
        job.updated_at = now;

        mirrored
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
