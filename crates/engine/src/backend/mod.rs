// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution backends: where a job's command actually runs

mod mock;
mod process;
mod shell;
mod ssh;

pub use mock::MockBackend;
pub use shell::LocalShellBackend;
pub use ssh::{ssh_args, HostKeyPolicy, SshAuth, SshBackend, SshConfig};

use crate::credentials::CredentialResolver;
use crate::error::RunError;
use async_trait::async_trait;
use opscal_adapters::SecretStore;
use opscal_core::{ExecutionPlan, ExecutionResult, JobExecutionSpec};
use std::time::Duration;

/// Runs one job command and reports what it printed and how it exited.
///
/// A non-zero exit is a result, not an error. Errors mean the command could
/// not be run (or finished) at all.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn execute(&self, spec: &JobExecutionSpec) -> Result<ExecutionResult, RunError>;
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Deadline for shell and SSH commands
    pub timeout: Duration,
    /// Pause between mock transcript steps
    pub mock_step_delay: Duration,
    pub ssh: SshConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            mock_step_delay: Duration::from_secs(1),
            ssh: SshConfig::default(),
        }
    }
}

/// One instance of every backend, selected per run by [`ExecutionPlan`]
#[derive(Clone)]
pub struct Backends<S> {
    pub mock: MockBackend,
    pub shell: LocalShellBackend,
    pub ssh: SshBackend<S>,
}

impl<S: SecretStore> Backends<S> {
    pub fn new(secrets: S, config: &BackendConfig) -> Self {
        Self {
            mock: MockBackend::new(config.mock_step_delay),
            shell: LocalShellBackend::new(config.timeout),
            ssh: SshBackend::new(
                CredentialResolver::new(secrets),
                config.ssh.clone(),
                config.timeout,
            ),
        }
    }

    pub fn select(&self, plan: &ExecutionPlan) -> &dyn ExecutionBackend {
        match plan {
            ExecutionPlan::Mock(_) => &self.mock,
            ExecutionPlan::LocalShell => &self.shell,
            ExecutionPlan::Ssh => &self.ssh,
        }
    }

    pub async fn execute(
        &self,
        plan: &ExecutionPlan,
        spec: &JobExecutionSpec,
    ) -> Result<ExecutionResult, RunError> {
        self.select(plan).execute(spec).await
    }
}
