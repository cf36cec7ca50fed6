// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar specs: job mirrors, manual events and conflict markers

use crate::prelude::*;

fn conflict_lines(stdout: &str) -> usize {
    stdout.lines().filter(|l| l.starts_with('!')).count()
}

/// Project 1 with a job scheduled 09:00-10:00 (mirror event 1)
fn scheduled_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal()
        .args(&[
            "job",
            "add",
            "1",
            "deploy",
            "--command",
            "mock:terraform",
            "--start",
            "2026-06-01T09:00:00Z",
            "--end",
            "2026-06-01T10:00:00Z",
        ])
        .passes()
        .stdout_eq("Created job 1 (deploy)\nScheduled at 2026-06-01T09:00:00Z\n");
    ws
}

#[test]
fn scheduled_job_appears_on_calendar() {
    let ws = scheduled_workspace();
    let run = ws
        .opscal()
        .args(&["calendar", "--project", "1"])
        .passes()
        .stdout_has("deploy (job 1)")
        .stdout_has("2026-06-01T10:00:00Z");
    assert_eq!(conflict_lines(&run.stdout()), 0);
}

#[test]
fn unscheduled_job_stays_off_calendar() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    ws.opscal()
        .args(&["job", "add", "1", "backlog"])
        .passes()
        .stdout_eq("Created job 1 (backlog)\n");
    ws.opscal()
        .args(&["calendar"])
        .passes()
        .stdout_eq("No events found.\n");
}

#[test]
fn overlapping_event_marks_both_entries() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&[
            "event",
            "add",
            "1",
            "standup",
            "--start",
            "2026-06-01T09:30:00Z",
            "--end",
            "2026-06-01T10:30:00Z",
            "--type",
            "meeting",
        ])
        .passes()
        .stdout_has("Created event 2");

    let run = ws.opscal().args(&["conflicts", "1"]).passes();
    assert_eq!(conflict_lines(&run.stdout()), 2);

    let events = ws
        .opscal()
        .args(&["--format", "json", "calendar", "--project", "1"])
        .passes()
        .json();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["conflict"] == true));
    assert_eq!(events[1]["event_type"], "meeting");
    assert!(events[1]["job_id"].is_null());
}

#[test]
fn back_to_back_events_do_not_conflict() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&["event", "add", "1", "handover", "--start", "2026-06-01T10:00:00Z"])
        .passes();
    ws.opscal()
        .args(&["conflicts", "1"])
        .passes()
        .stdout_eq("No conflicts.\n");
}

#[test]
fn moving_the_mirror_reschedules_the_job() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&[
            "event",
            "add",
            "1",
            "standup",
            "--start",
            "2026-06-01T09:30:00Z",
            "--end",
            "2026-06-01T10:30:00Z",
        ])
        .passes();

    ws.opscal()
        .args(&[
            "event",
            "move",
            "1",
            "--start",
            "2026-06-01T11:00:00Z",
            "--end",
            "2026-06-01T12:00:00Z",
        ])
        .passes()
        .stdout_has("Moved event 1");

    ws.opscal()
        .args(&["job", "show", "1"])
        .passes()
        .stdout_has("Planned: 2026-06-01T11:00:00Z .. 2026-06-01T12:00:00Z");
    ws.opscal()
        .args(&["conflicts", "1"])
        .passes()
        .stdout_eq("No conflicts.\n");
}

#[test]
fn removing_the_mirror_unschedules_the_job() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&["event", "rm", "1"])
        .passes()
        .stdout_eq("Removed event 1; job 1 is now unscheduled\n");

    ws.opscal()
        .args(&["job", "show", "1"])
        .passes()
        .stdout_has("Planned: - .. -");
    ws.opscal()
        .args(&["calendar"])
        .passes()
        .stdout_eq("No events found.\n");
}

#[test]
fn job_updates_follow_onto_the_calendar() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&["job", "update", "1", "--title", "deploy api", "--start", "2026-06-01T09:15:00Z"])
        .passes()
        .stdout_eq("Updated job 1\n");
    ws.opscal()
        .args(&["calendar"])
        .passes()
        .stdout_has("2026-06-01T09:15:00Z")
        .stdout_has("deploy api (job 1)");

    ws.opscal()
        .args(&["job", "update", "1", "--unschedule"])
        .passes();
    ws.opscal()
        .args(&["calendar"])
        .passes()
        .stdout_eq("No events found.\n");
}

#[test]
fn deleting_a_job_clears_its_conflicts() {
    let ws = scheduled_workspace();
    ws.opscal()
        .args(&["event", "add", "1", "call", "--start", "2026-06-01T09:30:00Z"])
        .passes();
    ws.opscal()
        .args(&["job", "rm", "1"])
        .passes()
        .stdout_eq("Deleted job 1 (deploy)\n");

    let run = ws
        .opscal()
        .args(&["calendar"])
        .passes()
        .stdout_has("call")
        .stdout_lacks("(job 1)");
    assert_eq!(conflict_lines(&run.stdout()), 0);
}

#[test]
fn calendar_range_is_inclusive_on_start() {
    let ws = Workspace::new();
    ws.opscal().args(&["project", "add", "infra"]).passes();
    for (title, start) in [
        ("early", "2026-06-01T08:00:00Z"),
        ("noon", "2026-06-01T12:00:00Z"),
        ("late", "2026-06-01T15:00:00Z"),
    ] {
        ws.opscal()
            .args(&["event", "add", "1", title, "--start", start])
            .passes();
    }

    ws.opscal()
        .args(&[
            "calendar",
            "--from",
            "2026-06-01T08:00:00Z",
            "--to",
            "2026-06-01T12:00:00Z",
        ])
        .passes()
        .stdout_has("early")
        .stdout_has("noon")
        .stdout_lacks("late");
}
