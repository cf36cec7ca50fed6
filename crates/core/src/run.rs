// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run state machine
//!
//! A Run is one execution attempt of a Job:
//!
//! ```text
//! queued -> running -> success | failed
//!    \-------------------------> canceled (exposed, never driven automatically)
//! ```
//!
//! `finished_at` and `exit_code` are written exactly once, by [`Run::finish`],
//! and a terminal Run rejects every further transition.

use crate::id::{JobId, RunId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Exit code recorded when no process ever produced one
pub const NO_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    #[serde(alias = "pending")]
    Queued,
    Running,
    Success,
    Failed,
    Canceled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Failed | RunStatus::Canceled
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Queued => "queued",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("run {run} cannot start from {from}")]
    CannotStart { run: RunId, from: RunStatus },
    #[error("run {run} is already {status}")]
    AlreadyTerminal { run: RunId, status: RunStatus },
    #[error("run {run} cannot finish as {status}: not a terminal status")]
    NotTerminal { run: RunId, status: RunStatus },
}

/// Terminal result handed to [`Run::finish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub log: String,
}

impl RunOutcome {
    /// Outcome of a process that exited on its own: success iff exit code 0
    pub fn exited(exit_code: i32, stdout: String, stderr: String, log: String) -> Self {
        let status = if exit_code == 0 {
            RunStatus::Success
        } else {
            RunStatus::Failed
        };
        Self {
            status,
            exit_code,
            stdout,
            stderr,
            log,
        }
    }
}

/// One execution attempt of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub job_id: JobId,
    pub status: RunStatus,
    pub queued_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// Combined transcript: orchestration notes plus captured output
    #[serde(default)]
    pub log: String,
}

impl Run {
    pub fn queued(id: RunId, job_id: JobId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            job_id,
            status: RunStatus::Queued,
            queued_at: now,
            started_at: None,
            finished_at: None,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            log: String::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// queued -> running
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.status != RunStatus::Queued {
            return Err(TransitionError::CannotStart {
                run: self.id,
                from: self.status,
            });
        }
        self.status = RunStatus::Running;
        self.started_at = Some(now);
        Ok(())
    }

    /// Move to a terminal status, recording outcome, exit code and finish time
    pub fn finish(&mut self, outcome: RunOutcome, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::AlreadyTerminal {
                run: self.id,
                status: self.status,
            });
        }
        if !outcome.status.is_terminal() {
            return Err(TransitionError::NotTerminal {
                run: self.id,
                status: outcome.status,
            });
        }

        // started_at <= finished_at even if the clock stepped backwards
        let finished = match self.started_at {
            Some(started) if started > now => started,
            _ => now,
        };

        self.status = outcome.status;
        self.exit_code = Some(outcome.exit_code);
        self.stdout = outcome.stdout;
        self.stderr = outcome.stderr;
        self.log = outcome.log;
        self.finished_at = Some(finished);
        Ok(())
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
