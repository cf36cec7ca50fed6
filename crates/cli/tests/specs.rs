// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specifications for the opscal CLI.
//!
//! These tests are black-box: they invoke the CLI binary against an
//! isolated state directory and verify stdout, stderr and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// planning/
#[path = "specs/planning/calendar.rs"]
mod planning_calendar;
#[path = "specs/planning/projects.rs"]
mod planning_projects;
#[path = "specs/planning/search.rs"]
mod planning_search;

// execution/
#[path = "specs/execution/runs.rs"]
mod execution_runs;
