// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git repository adapter

use super::{validate_name, RepoAdapter, RepoError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default wall-clock bound on a single git invocation
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(120);

struct GitOutput {
    success: bool,
    stderr: String,
}

/// Git CLI adapter; checkouts live directly under `root`
#[derive(Clone)]
pub struct GitAdapter {
    root: PathBuf,
    timeout: Duration,
}

impl GitAdapter {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run_git(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, RepoError> {
        let child = Command::new("git")
            .current_dir(cwd)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| RepoError::Timeout {
                command: args.first().copied().unwrap_or("git").to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| RepoError::CommandFailed(e.to_string()))?;

        Ok(GitOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[async_trait]
impl RepoAdapter for GitAdapter {
    async fn clone_or_pull(&self, url: &str, name: &str) -> Result<PathBuf, RepoError> {
        validate_name(name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepoError::CommandFailed(e.to_string()))?;

        let target = self.root.join(name);
        if target.join(".git").exists() {
            let out = self.run_git(&target, &["fetch", "--all"]).await?;
            if !out.success {
                return Err(RepoError::FetchFailed(out.stderr));
            }
            return Ok(target);
        }

        // Leftover directory without a repo in it
        if target.exists() {
            tokio::fs::remove_dir_all(&target)
                .await
                .map_err(|e| RepoError::CommandFailed(e.to_string()))?;
        }

        let out = self.run_git(&self.root, &["clone", "--", url, name]).await?;
        if !out.success {
            return Err(RepoError::CloneFailed(out.stderr));
        }
        Ok(target)
    }

    async fn checkout(&self, path: &Path, git_ref: &str) -> Result<(), RepoError> {
        if git_ref.is_empty() || git_ref.starts_with('-') {
            return Err(RepoError::CheckoutFailed {
                git_ref: git_ref.to_string(),
                message: "not a valid ref".to_string(),
            });
        }
        let out = self.run_git(path, &["checkout", git_ref]).await?;
        if !out.success {
            return Err(RepoError::CheckoutFailed {
                git_ref: git_ref.to_string(),
                message: out.stderr,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
