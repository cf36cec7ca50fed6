// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_job_is_reported() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["job", "show", "9"])
        .fails()
        .stderr_has("job 9 not found");
}

#[test]
fn job_in_unknown_project_is_rejected() {
    let ws = Workspace::new();
    ws.opscal()
        .args(&["job", "add", "4", "deploy"])
        .fails()
        .stderr_has("project 4 not found");
}

#[test]
fn malformed_timestamp_is_a_usage_error() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal()
        .args(&["event", "add", "1", "freeze", "--start", "next tuesday"])
        .fails()
        .stderr_has("RFC 3339");
}

#[test]
fn end_before_start_is_rejected() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal()
        .args(&[
            "job",
            "add",
            "1",
            "deploy",
            "--start",
            "2026-06-01T10:00:00Z",
            "--end",
            "2026-06-01T09:00:00Z",
        ])
        .fails()
        .stderr_has("is before start");
}

#[test]
fn missing_config_file_is_reported() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.config_path()).unwrap();
    ws.opscal()
        .args(&["project", "list"])
        .fails()
        .stderr_has("reading config");
}

#[test]
fn unknown_config_key_is_reported() {
    let ws = Workspace::new();
    std::fs::write(ws.config_path(), "[execution]\ntimout = \"5m\"\n").unwrap();
    ws.opscal()
        .args(&["project", "list"])
        .fails()
        .stderr_has("parsing config");
}
