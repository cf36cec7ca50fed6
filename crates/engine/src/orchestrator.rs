// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration: queued -> running -> success | failed
//!
//! A run is created `queued` and persisted before anything executes. Runs of
//! the same job execute one at a time; later ones wait in `queued`. Every
//! failure after creation lands in the run record instead of escaping.

use crate::backend::Backends;
use crate::error::{EngineError, RunError};
use crate::git_context::GitContextBuilder;
use crate::locks::KeyedLocks;
use crate::run_log::RunLog;
use opscal_adapters::{RepoAdapter, SecretStore};
use opscal_core::{
    Clock, ExecutionPlan, ExecutionResult, Job, JobExecutionSpec, JobId, Run, RunId, RunOutcome,
    RunStatus, NO_EXIT_CODE,
};
use opscal_storage::Store;
use std::sync::Arc;
use tracing::Instrument;

struct Inner<S, R, C> {
    store: Store,
    backends: Backends<S>,
    git: GitContextBuilder<R>,
    clock: C,
    jobs: KeyedLocks<JobId>,
}

/// Drives runs of jobs through their lifecycle
pub struct RunOrchestrator<S, R, C> {
    inner: Arc<Inner<S, R, C>>,
}

impl<S, R, C> Clone for RunOrchestrator<S, R, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, R, C> RunOrchestrator<S, R, C>
where
    S: SecretStore,
    R: RepoAdapter,
    C: Clock,
{
    pub fn new(store: Store, backends: Backends<S>, git: GitContextBuilder<R>, clock: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                backends,
                git,
                clock,
                jobs: KeyedLocks::new(),
            }),
        }
    }

    fn queue(&self, job_id: JobId) -> Result<Run, EngineError> {
        if self.inner.store.job(job_id).is_none() {
            return Err(EngineError::JobNotFound(job_id));
        }
        let run = self.inner.store.create_run(job_id, self.inner.clock.now())?;
        tracing::info!(run_id = %run.id, job_id = %job_id, "run queued");
        Ok(run)
    }

    /// Queue a run and execute it in the background.
    ///
    /// Returns as soon as the run is persisted, still `queued`.
    pub fn trigger(&self, job_id: JobId) -> Result<Run, EngineError> {
        let run = self.queue(job_id)?;
        let this = self.clone();
        let run_id = run.id;
        tokio::spawn(async move {
            if let Err(e) = this.execute(run_id).await {
                tracing::error!(run_id = %run_id, error = %e, "run could not execute");
            }
        });
        Ok(run)
    }

    /// Queue a run and wait for it to reach a terminal status
    pub async fn run_to_completion(&self, job_id: JobId) -> Result<Run, EngineError> {
        let run = self.queue(job_id)?;
        self.execute(run.id).await
    }

    /// Execute a queued run and return its final record
    pub async fn execute(&self, run_id: RunId) -> Result<Run, EngineError> {
        let run = self
            .inner
            .store
            .run(run_id)
            .ok_or(EngineError::RunNotFound(run_id))?;
        let span = tracing::info_span!("run.execute", run_id = %run_id, job_id = %run.job_id);
        self.execute_locked(run_id, run.job_id).instrument(span).await
    }

    async fn execute_locked(&self, run_id: RunId, job_id: JobId) -> Result<Run, EngineError> {
        let _guard = self.inner.jobs.lock(job_id).await;
        let store = &self.inner.store;

        // Re-read: the job (and its runs) may have been deleted while waiting
        let mut run = store.run(run_id).ok_or(EngineError::RunNotFound(run_id))?;
        let job = store.job(job_id).ok_or(EngineError::JobNotFound(job_id))?;

        run.start(self.inner.clock.now())?;
        store.update_run(&run)?;
        self.set_job_status(job_id, run.status)?;
        tracing::info!("run started");

        let mut log = RunLog::new();
        let started = std::time::Instant::now();
        let outcome = match self.perform(&job, &mut log).await {
            Ok(result) => RunOutcome::exited(
                result.exit_code,
                result.stdout,
                result.stderr,
                log.finish(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "run failed before completing");
                log.error(&e.to_string());
                RunOutcome {
                    status: RunStatus::Failed,
                    exit_code: NO_EXIT_CODE,
                    stdout: String::new(),
                    stderr: format!("Execution Error: {}", e),
                    log: log.finish(),
                }
            }
        };

        run.finish(outcome, self.inner.clock.now())?;
        store.update_run(&run)?;
        self.set_job_status(job_id, run.status)?;
        tracing::info!(
            status = %run.status,
            exit_code = run.exit_code.unwrap_or(NO_EXIT_CODE),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(run)
    }

    /// Atomic so edits made while the run executed are kept
    fn set_job_status(&self, job_id: JobId, status: RunStatus) -> Result<(), EngineError> {
        let now = self.inner.clock.now();
        self.inner.store.modify_job(job_id, |job| {
            job.status = status.into();
            job.updated_at = now;
        })?;
        Ok(())
    }

    async fn perform(&self, job: &Job, log: &mut RunLog) -> Result<ExecutionResult, RunError> {
        let plan = ExecutionPlan::resolve(job)?;
        tracing::debug!(plan = %plan, "execution plan");

        let cwd = match &plan {
            ExecutionPlan::Mock(scenario) => {
                log.note(format!("Starting Mock Execution: {}", scenario));
                None
            }
            _ => {
                let repos = self.inner.store.repos_for_project(job.project_id);
                let cwd = self
                    .inner
                    .git
                    .prepare(&repos, job.working_dir.as_deref(), log)
                    .await?;
                log.note(format!("Executing: {}", job.effective_command()));
                Some(cwd)
            }
        };
        debug_assert_eq!(cwd.is_some(), plan.needs_workdir());

        let spec = JobExecutionSpec::for_job(job, cwd);
        let result = self.inner.backends.execute(&plan, &spec).await?;

        if matches!(plan, ExecutionPlan::Mock(_)) {
            // A replayed transcript is the log itself
            log.note(result.stdout.clone());
        } else {
            log.output(&result);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
