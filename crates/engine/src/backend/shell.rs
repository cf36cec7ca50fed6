// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local shell backend

use super::process::{run_to_end, ProcessError};
use super::ExecutionBackend;
use crate::error::RunError;
use async_trait::async_trait;
use opscal_core::{ExecutionResult, JobExecutionSpec};
use std::time::Duration;
use tokio::process::Command;

/// Runs the job command through `sh -c` on this host
#[derive(Debug, Clone)]
pub struct LocalShellBackend {
    timeout: Duration,
}

impl LocalShellBackend {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ExecutionBackend for LocalShellBackend {
    async fn execute(&self, spec: &JobExecutionSpec) -> Result<ExecutionResult, RunError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&spec.command);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        run_to_end(cmd, self.timeout).await.map_err(|e| match e {
            ProcessError::Spawn(err) => RunError::Execution(format!("sh: {}", err)),
            ProcessError::Timeout(after) => RunError::Timeout(after),
        })
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
