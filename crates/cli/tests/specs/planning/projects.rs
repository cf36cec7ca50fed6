// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project and repository specs

use crate::prelude::*;

#[test]
fn project_list_empty() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["project", "list"])
        .passes()
        .stdout_eq("No projects found.\n");
}

#[test]
fn projects_persist_between_invocations() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["project", "add", "infra"])
        .passes()
        .stdout_eq("Created project 1 (infra)\n");
    ws.opscal().args(&["project", "add", "web"]).passes();

    ws.opscal()
        .args(&["project", "list"])
        .passes()
        .stdout_has("NAME")
        .stdout_has("infra")
        .stdout_has("web");

    assert!(ws.state_dir().join("opscal.wal").is_file());
}

#[test]
fn project_list_as_json() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();

    let projects = ws
        .opscal()
        .args(&["--format", "json", "project", "list"])
        .passes()
        .json();

    assert_eq!(projects.as_array().unwrap().len(), 1);
    assert_eq!(projects[0]["id"], 1);
    assert_eq!(projects[0]["name"], "infra");
}

#[test]
fn repo_attached_with_default_branch() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal()
        .args(&["repo", "add", "1", "playbooks", "https://git.example/ops/playbooks.git"])
        .passes()
        .stdout_eq("Attached repo 1 (playbooks) to project 1\n");

    ws.opscal()
        .args(&["repo", "list", "1"])
        .passes()
        .stdout_has("playbooks")
        .stdout_has("main")
        .stdout_has("https://git.example/ops/playbooks.git");
}

#[test]
fn commands_write_the_log_file() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();

    let log = std::fs::read_to_string(ws.state_dir().join("opscal.log")).unwrap();
    assert!(log.contains("project created"), "log:\n{log}");
}
