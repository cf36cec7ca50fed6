// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution plans: which backend runs a job, and with what inputs

use crate::id::JobId;
use crate::job::{CommandType, Job};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Commands with this prefix replay a canned transcript instead of running
pub const MOCK_PREFIX: &str = "mock:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("unsupported command type: {0}")]
    UnsupportedCommandType(String),
}

/// Canned transcript selected by a `mock:<scenario>` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockScenario {
    Ansible,
    Terraform,
    Unknown(String),
}

impl MockScenario {
    /// Parse the text after `mock:`; case and surrounding whitespace are ignored
    pub fn parse(raw: &str) -> Self {
        let name = raw.split(':').next().unwrap_or_default().trim().to_lowercase();
        match name.as_str() {
            "ansible" => MockScenario::Ansible,
            "terraform" => MockScenario::Terraform,
            _ => MockScenario::Unknown(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MockScenario::Ansible => "ansible",
            MockScenario::Terraform => "terraform",
            MockScenario::Unknown(name) => name,
        }
    }
}

impl fmt::Display for MockScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Backend selection, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    Mock(MockScenario),
    LocalShell,
    Ssh,
}

impl ExecutionPlan {
    /// A `mock:` command always wins; otherwise the job's command type decides.
    pub fn resolve(job: &Job) -> Result<Self, PlanError> {
        if let Some(rest) = job.effective_command().strip_prefix(MOCK_PREFIX) {
            return Ok(ExecutionPlan::Mock(MockScenario::parse(rest)));
        }
        match job.command_type {
            CommandType::Shell => Ok(ExecutionPlan::LocalShell),
            CommandType::Ssh => Ok(ExecutionPlan::Ssh),
            CommandType::Unsupported => Err(PlanError::UnsupportedCommandType(
                job.command_type.to_string(),
            )),
        }
    }

    /// Whether the plan needs a prepared working directory
    pub fn needs_workdir(&self) -> bool {
        !matches!(self, ExecutionPlan::Mock(_))
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPlan::Mock(s) => write!(f, "mock:{}", s),
            ExecutionPlan::LocalShell => write!(f, "shell"),
            ExecutionPlan::Ssh => write!(f, "ssh"),
        }
    }
}

/// Everything a backend needs to run one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobExecutionSpec {
    pub job_id: JobId,
    pub command: String,
    pub cwd: Option<PathBuf>,
    pub target_host: Option<String>,
    pub target_user: Option<String>,
    pub credential_key: Option<String>,
}

impl JobExecutionSpec {
    pub fn for_job(job: &Job, cwd: Option<PathBuf>) -> Self {
        Self {
            job_id: job.id,
            command: job.effective_command().to_string(),
            cwd,
            target_host: non_blank(&job.target_host),
            target_user: non_blank(&job.target_user),
            credential_key: non_blank(&job.credential_key),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Captured result of a finished process (or replayed transcript)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
