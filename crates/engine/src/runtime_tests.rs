// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use opscal_adapters::{FakeRepoAdapter, FakeSecretStore};
use opscal_core::{FakeClock, NewJob, RunStatus, UserId};
use std::time::Duration;

#[tokio::test]
async fn planner_and_orchestrator_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("opscal.wal")).unwrap();
    let runtime = Runtime::new(
        RuntimeDeps {
            store,
            secrets: FakeSecretStore::new(),
            repos: FakeRepoAdapter::new(dir.path().join("repos")),
        },
        FakeClock::new(),
        RuntimeConfig {
            execution_root: dir.path().join("execution"),
            backends: BackendConfig {
                mock_step_delay: Duration::ZERO,
                ..BackendConfig::default()
            },
        },
    );

    let project = runtime.planner().create_project("infra", UserId(1)).unwrap();
    let job = runtime
        .planner()
        .create_job(NewJob::new(project.id, "provision", UserId(1)).with_command("mock:terraform"))
        .await
        .unwrap();

    let run = runtime.orchestrator().run_to_completion(job.id).await.unwrap();

    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(runtime.planner().runs(job.id).unwrap(), vec![run.clone()]);
    assert_eq!(runtime.planner().run(run.id).unwrap(), run);
}
