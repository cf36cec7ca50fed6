// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run execution specs

use crate::prelude::*;

fn workspace_with_job(extra: &[&str]) -> Workspace {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    let mut args = vec!["job", "add", "1", "task"];
    args.extend_from_slice(extra);
    ws.opscal().args(&args).passes();
    ws
}

#[test]
fn mock_terraform_run_succeeds() {
    let ws = workspace_with_job(&["--command", "mock:terraform"]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("Run 1 of job 1: success")
        .stdout_has("Exit code: 0")
        .stdout_has("Starting Mock Execution: terraform")
        .stdout_has("Plan: 1 to add");

    ws.opscal()
        .args(&["job", "show", "1"])
        .passes()
        .stdout_has("Status: success");
}

#[test]
fn unknown_mock_scenario_fails_the_run() {
    let ws = workspace_with_job(&["--command", "mock:chef"]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("Run 1 of job 1: failed")
        .stdout_has("Exit code: 1")
        .stdout_has("Unknown mock type: chef");

    ws.opscal()
        .args(&["job", "show", "1"])
        .passes()
        .stdout_has("Status: failed");
}

#[test]
fn shell_run_captures_output() {
    let ws = workspace_with_job(&["--command", "echo hello"]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("No Git Repo found for project. Running in ephemeral dir.")
        .stdout_has("Executing: echo hello")
        .stdout_has("--- STDOUT ---\nhello");

    assert!(ws.state_dir().join("execution").is_dir());
}

#[test]
fn description_runs_when_command_is_empty() {
    let ws = workspace_with_job(&["--description", "echo from-description"]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("Run 1 of job 1: success")
        .stdout_has("from-description");
}

#[test]
fn run_as_json() {
    let ws = workspace_with_job(&["--command", "echo broken >&2; exit 3"]);

    let run = ws
        .opscal()
        .args(&["--format", "json", "job", "run", "1"])
        .passes()
        .json();

    assert_eq!(run["status"], "failed");
    assert_eq!(run["exit_code"], 3);
    assert_eq!(run["stderr"], "broken\n");
    assert!(run["log"].as_str().unwrap().contains("--- STDERR ---"));
    assert!(run["started_at"].is_string());
    assert!(run["finished_at"].is_string());
}

#[test]
fn escaping_workdir_fails_the_run() {
    let ws = workspace_with_job(&["--command", "ls", "--workdir", "../.."]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("Run 1 of job 1: failed")
        .stdout_has("SYSTEM ERROR:");
}

#[test]
fn ssh_run_without_reachable_vault_fails_the_run() {
    let ws = workspace_with_job(&[
        "--command",
        "uptime",
        "--command-type",
        "ssh",
        "--host",
        "web1",
        "--credential",
        "ssh/web1",
    ]);

    ws.opscal()
        .args(&["job", "run", "1"])
        .passes()
        .stdout_has("Run 1 of job 1: failed")
        .stdout_has("SYSTEM ERROR:")
        .stdout_lacks("Executing: uptime\n--- STDOUT ---");
}

#[test]
fn run_history_is_newest_first() {
    let ws = workspace_with_job(&["--command", "mock:terraform"]);
    ws.opscal().args(&["job", "run", "1"]).passes();
    ws.opscal().args(&["job", "run", "1"]).passes();

    let runs = ws
        .opscal()
        .args(&["--format", "json", "job", "runs", "1"])
        .passes()
        .json();
    let runs = runs.as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["id"], 2);
    assert_eq!(runs[1]["id"], 1);

    ws.opscal()
        .args(&["job", "runs", "1"])
        .passes()
        .stdout_has("STATUS")
        .stdout_has("success");
}

#[test]
fn deleting_a_job_removes_its_runs() {
    let ws = workspace_with_job(&["--command", "mock:terraform"]);
    ws.opscal().args(&["job", "run", "1"]).passes();
    ws.opscal().args(&["job", "rm", "1"]).passes();

    ws.opscal()
        .args(&["job", "runs", "1"])
        .fails()
        .stderr_has("job 1 not found");
}
