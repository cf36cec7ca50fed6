// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log
//!
//! Creates and updates carry whole records; replaying the log in order
//! rebuilds the store.

use crate::event::Event;
use crate::id::{EventId, JobId, ProjectId};
use crate::job::Job;
use crate::project::{Environment, GitRepo, Project};
use crate::run::Run;
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    ProjectCreate { project: Project },
    EnvironmentCreate { environment: Environment },
    RepoCreate { repo: GitRepo },

    JobCreate { job: Job },
    /// Replace a job record
    JobUpdate { job: Job },
    /// Delete a job with its runs and mirrored events
    JobDelete { id: JobId },

    RunCreate { run: Run },
    RunUpdate { run: Run },

    EventCreate { event: Event },
    EventUpdate { event: Event },
    EventDelete { id: EventId },

    /// Set every conflict flag of one project in a single step
    ConflictFlags {
        project_id: ProjectId,
        flags: Vec<(EventId, bool)>,
    },
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
