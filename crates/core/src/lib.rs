// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! opscal-core: domain model for the operations calendar
//!
//! This crate provides:
//! - Entity records (projects, jobs, runs, calendar events, git repos)
//! - The Run lifecycle state machine
//! - Execution plan resolution (which backend runs a job)
//! - The interval-overlap sweep behind calendar conflict flags
//!
//! Nothing in here performs I/O.

pub mod clock;
pub mod conflict;
pub mod event;
pub mod execution;
pub mod id;
pub mod job;
pub mod operation;
pub mod project;
pub mod run;

pub use clock::{Clock, FakeClock, SystemClock};
pub use conflict::{conflict_flags, overlaps, DEFAULT_EVENT_DURATION};
pub use event::{Event, EventPatch, EventType, NewEvent};
pub use execution::{
    ExecutionPlan, ExecutionResult, JobExecutionSpec, MockScenario, PlanError, MOCK_PREFIX,
};
pub use id::{EnvironmentId, EventId, JobId, ProjectId, RepoId, RunId, UserId};
pub use job::{CommandType, Job, JobPatch, JobPriority, JobStatus, JobType, NewJob};
pub use operation::Operation;
pub use project::{Environment, EnvironmentType, GitProvider, GitRepo, Project, ProjectStatus};
pub use run::{Run, RunOutcome, RunStatus, TransitionError, NO_EXIT_CODE};
