// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use opscal_adapters::{RepoError, SecretError};
use opscal_core::{
    EnvironmentId, EventId, JobId, PlanError, ProjectId, RunId, TransitionError,
};
use opscal_storage::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Failures scoped to one run
///
/// These never escape the orchestrator: they fail the run and are written
/// into its record.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("credential {key} unavailable: {source}")]
    CredentialUnavailable {
        key: String,
        #[source]
        source: SecretError,
    },
    #[error("missing credential: SSH job requires credential_key to be set")]
    MissingCredential,
    #[error("missing target host: SSH job requires target_host to be set")]
    MissingTargetHost,
    #[error("git operation failed: {0}")]
    GitOperation(#[from] RepoError),
    #[error("SSH connection failed: {0}")]
    SshConnection(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("execution timed out after {0:?}")]
    Timeout(Duration),
    #[error("unsupported command type: {0}")]
    UnsupportedCommandType(String),
}

impl From<PlanError> for RunError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::UnsupportedCommandType(t) => RunError::UnsupportedCommandType(t),
        }
    }
}

/// Errors surfaced to callers of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("environment {0} not found")]
    EnvironmentNotFound(EnvironmentId),
    #[error("environment {environment} belongs to project {owner}, not {project}")]
    ForeignEnvironment {
        environment: EnvironmentId,
        owner: ProjectId,
        project: ProjectId,
    },
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("run {0} not found")]
    RunNotFound(RunId),
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("end {end} is before start {start}")]
    InvalidWindow {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
}
