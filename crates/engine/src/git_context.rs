// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Working directory preparation for a run

use crate::error::RunError;
use crate::run_log::RunLog;
use opscal_adapters::RepoAdapter;
use opscal_core::GitRepo;
use std::path::{Component, Path, PathBuf};

/// Resolves the directory a job runs in.
///
/// The project's first repository is fetched and checked out at its default
/// branch; a project without repositories runs in the shared execution root.
/// A job's `working_dir` is then joined onto that base.
#[derive(Clone)]
pub struct GitContextBuilder<R> {
    repos: R,
    execution_root: PathBuf,
}

impl<R: RepoAdapter> GitContextBuilder<R> {
    pub fn new(repos: R, execution_root: impl Into<PathBuf>) -> Self {
        Self {
            repos,
            execution_root: execution_root.into(),
        }
    }

    pub fn execution_root(&self) -> &Path {
        &self.execution_root
    }

    pub async fn prepare(
        &self,
        repos: &[GitRepo],
        working_dir: Option<&str>,
        log: &mut RunLog,
    ) -> Result<PathBuf, RunError> {
        let base = match repos.first() {
            Some(repo) => {
                log.note(format!("Using Repo: {} ({})", repo.name, repo.url));
                let path = self
                    .repos
                    .clone_or_pull(&repo.url, &repo.checkout_name())
                    .await?;
                self.repos.checkout(&path, &repo.default_branch).await?;
                log.note(format!("Workdir set to: {}", path.display()));
                path
            }
            None => {
                log.note("No Git Repo found for project. Running in ephemeral dir.");
                tokio::fs::create_dir_all(&self.execution_root)
                    .await
                    .map_err(|e| {
                        RunError::Execution(format!(
                            "cannot create {}: {}",
                            self.execution_root.display(),
                            e
                        ))
                    })?;
                self.execution_root.clone()
            }
        };

        let Some(relative) = working_dir.map(str::trim).filter(|w| !w.is_empty()) else {
            return Ok(base);
        };
        if !stays_inside(Path::new(relative)) {
            return Err(RunError::Execution(format!(
                "working directory must be relative to the checkout: {}",
                relative
            )));
        }
        let dir = base.join(relative);
        log.note(format!("Changing directory to: {}", dir.display()));
        Ok(dir)
    }
}

/// Relative, and never climbs above its base
fn stays_inside(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
#[path = "git_context_tests.rs"]
mod tests;
