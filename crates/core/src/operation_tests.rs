// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::RunId;

#[test]
fn conflict_flags_serialize_as_pairs() {
    let op = Operation::ConflictFlags {
        project_id: ProjectId(3),
        flags: vec![(EventId(1), true), (EventId(2), false)],
    };
    let json = serde_json::to_string(&op).unwrap();
    assert_eq!(
        json,
        r#"{"ConflictFlags":{"project_id":3,"flags":[[1,true],[2,false]]}}"#
    );
    let back: Operation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, op);
}

#[test]
fn legacy_run_without_log_fields_parses() {
    // Runs written before the transcript fields existed
    let json = r#"{"RunCreate":{"run":{"id":4,"job_id":2,"status":"pending","queued_at":"2026-01-01T00:00:00Z"}}}"#;
    let op: Operation = serde_json::from_str(json).unwrap();
    match op {
        Operation::RunCreate { run } => {
            assert_eq!(run.id, RunId(4));
            assert_eq!(run.status, crate::run::RunStatus::Queued);
            assert!(run.log.is_empty());
        }
        other => panic!("expected RunCreate, got {:?}", other),
    }
}
