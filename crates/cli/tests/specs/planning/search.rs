// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment and search specs

use crate::prelude::*;

#[test]
fn job_targets_only_its_own_projects_environment() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal().args(&["project", "add", "web"]).passes();
    ws.opscal()
        .args(&["env", "add", "1", "prod", "--kind", "prod"])
        .passes()
        .stdout_eq("Created environment 1 (prod) in project 1\n");
    ws.opscal().args(&["env", "add", "2", "staging"]).passes();

    ws.opscal()
        .args(&["job", "add", "1", "deploy", "--env", "1"])
        .passes();
    ws.opscal()
        .args(&["job", "show", "1"])
        .passes()
        .stdout_has("Environment: 1");

    ws.opscal()
        .args(&["job", "add", "1", "stray", "--env", "2"])
        .fails()
        .stderr_has("environment 2 belongs to project 2, not 1");
    ws.opscal()
        .args(&["job", "update", "1", "--env", "9"])
        .fails()
        .stderr_has("environment 9 not found");

    ws.opscal()
        .args(&["env", "list", "1"])
        .passes()
        .stdout_has("prod")
        .stdout_lacks("staging");
}

#[test]
fn search_finds_projects_jobs_and_events() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "Billing"]).passes();
    ws.opscal()
        .args(&["job", "add", "1", "rotate billing keys"])
        .passes();
    ws.opscal()
        .args(&["event", "add", "1", "billing freeze", "--start", "2026-06-01T09:00:00Z"])
        .passes();
    ws.opscal().args(&["job", "add", "1", "unrelated"]).passes();

    ws.opscal()
        .args(&["search", "BILLING"])
        .passes()
        .stdout_has("project 1")
        .stdout_has("rotate billing keys")
        .stdout_has("billing freeze (other on 2026-06-01)")
        .stdout_lacks("unrelated");

    let hits = ws
        .opscal()
        .args(&["--format", "json", "search", "freeze"])
        .passes()
        .json();
    assert_eq!(hits["projects"].as_array().unwrap().len(), 0);
    assert_eq!(hits["events"][0]["title"], "billing freeze");

    ws.opscal()
        .args(&["search", "nothing here"])
        .passes()
        .stdout_eq("No matches.\n");
}
