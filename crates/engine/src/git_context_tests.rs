// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use opscal_adapters::{FakeRepoAdapter, RepoCall, RepoError};
use opscal_core::{GitProvider, ProjectId, RepoId};
use tempfile::TempDir;

fn repo() -> GitRepo {
    GitRepo {
        id: RepoId(3),
        project_id: ProjectId(12),
        name: "infra".to_string(),
        provider: GitProvider::Github,
        url: "https://github.com/acme/infra.git".to_string(),
        default_branch: "release".to_string(),
        credentials_ref: None,
    }
}

fn builder(dir: &TempDir) -> (FakeRepoAdapter, GitContextBuilder<FakeRepoAdapter>) {
    let fake = FakeRepoAdapter::new(dir.path().join("repos"));
    let builder = GitContextBuilder::new(fake.clone(), dir.path().join("execution"));
    (fake, builder)
}

#[tokio::test]
async fn first_repo_is_fetched_and_checked_out() {
    let dir = tempfile::tempdir().unwrap();
    let (fake, builder) = builder(&dir);
    let mut log = RunLog::new();

    let path = builder.prepare(&[repo()], None, &mut log).await.unwrap();

    let expected = dir.path().join("repos").join("proj_12_repo_3");
    assert_eq!(path, expected);
    assert_eq!(
        fake.calls(),
        vec![
            RepoCall::CloneOrPull {
                url: "https://github.com/acme/infra.git".to_string(),
                name: "proj_12_repo_3".to_string(),
            },
            RepoCall::Checkout {
                path: expected.clone(),
                git_ref: "release".to_string(),
            },
        ]
    );
    assert_eq!(
        log.lines(),
        [
            "Using Repo: infra (https://github.com/acme/infra.git)".to_string(),
            format!("Workdir set to: {}", expected.display()),
        ]
    );
}

#[tokio::test]
async fn no_repo_runs_in_execution_root() {
    let dir = tempfile::tempdir().unwrap();
    let (fake, builder) = builder(&dir);
    let mut log = RunLog::new();

    let path = builder.prepare(&[], None, &mut log).await.unwrap();

    assert_eq!(path, dir.path().join("execution"));
    assert!(path.is_dir());
    assert!(fake.calls().is_empty());
    assert_eq!(
        log.lines(),
        ["No Git Repo found for project. Running in ephemeral dir."]
    );
}

#[tokio::test]
async fn working_dir_is_joined_onto_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let (_fake, builder) = builder(&dir);
    let mut log = RunLog::new();

    let path = builder
        .prepare(&[repo()], Some("deploy/prod"), &mut log)
        .await
        .unwrap();

    let expected = dir.path().join("repos/proj_12_repo_3/deploy/prod");
    assert_eq!(path, expected);
    assert_eq!(
        log.lines().last().unwrap(),
        &format!("Changing directory to: {}", expected.display())
    );
}

#[tokio::test]
async fn escaping_working_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_fake, builder) = builder(&dir);

    for bad in ["../other", "/etc", "a/../../b"] {
        let err = builder
            .prepare(&[], Some(bad), &mut RunLog::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Execution(_)), "{bad}");
    }
}

#[tokio::test]
async fn clone_failure_is_a_git_error() {
    let dir = tempfile::tempdir().unwrap();
    let (fake, builder) = builder(&dir);
    fake.fail_clone("repository not found");

    let err = builder
        .prepare(&[repo()], None, &mut RunLog::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::GitOperation(RepoError::CloneFailed(_))
    ));
}

#[tokio::test]
async fn checkout_failure_is_a_git_error() {
    let dir = tempfile::tempdir().unwrap();
    let (fake, builder) = builder(&dir);
    fake.fail_checkout("unknown revision");

    let err = builder
        .prepare(&[repo()], None, &mut RunLog::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::GitOperation(RepoError::CheckoutFailed { .. })
    ));
}
