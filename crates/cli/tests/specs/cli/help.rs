// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command_group() {
    let ws = Workspace::new();
    let run = ws.opscal().args(&["--help"]).passes();
    for command in [
        "project", "repo", "env", "job", "event", "calendar", "conflicts", "search",
    ] {
        assert!(run.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn job_help_lists_subcommands() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["job", "--help"])
        .passes()
        .stdout_has("add")
        .stdout_has("update")
        .stdout_has("runs");
}

#[test]
fn unknown_command_is_a_usage_error() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["deploy"])
        .fails()
        .stderr_has("unrecognized subcommand");
}
