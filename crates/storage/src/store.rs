// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity store: WAL-backed materialized state behind one lock
//!
//! Every write is appended to the log before it is applied, and id
//! allocation happens under the same lock as the write that uses the id.

use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use chrono::{DateTime, Utc};
use opscal_core::{
    Environment, EnvironmentId, EnvironmentType, Event, EventId, GitProvider, GitRepo, Job,
    JobId, NewJob, Operation, Project, ProjectId, ProjectStatus, RepoId, Run, RunId, UserId,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Wal(#[from] WalError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
}

impl StoreError {
    fn not_found(kind: &'static str, id: impl Into<u64>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

struct Inner {
    wal: Option<Wal>,
    state: MaterializedState,
}

impl Inner {
    fn commit(&mut self, op: Operation) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            wal.append(&op)?;
        }
        self.state.apply(&op);
        Ok(())
    }

    fn require_project(&self, id: ProjectId) -> Result<(), StoreError> {
        if self.state.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found("project", id.get()))
        }
    }
}

/// Shared handle to the entity store
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl Store {
    /// Replay the log at `path` and keep appending to it
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let (wal, ops) = Wal::open(path)?;
        let mut state = MaterializedState::default();
        for op in &ops {
            state.apply(op);
        }
        tracing::debug!(path = %path.display(), operations = ops.len(), "store opened");
        Ok(Self::with_parts(Some(wal), state))
    }

    /// Volatile store, for tests and dry runs
    pub fn in_memory() -> Self {
        Self::with_parts(None, MaterializedState::default())
    }

    fn with_parts(wal: Option<Wal>, state: MaterializedState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { wal, state })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a read-only query against the current state
    pub fn read<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        f(&self.lock().state)
    }

    // -- reads --

    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.read(|s| s.projects.get(&id).cloned())
    }

    pub fn projects(&self) -> Vec<Project> {
        self.read(|s| s.projects.values().cloned().collect())
    }

    pub fn environment(&self, id: EnvironmentId) -> Option<Environment> {
        self.read(|s| s.environments.get(&id).cloned())
    }

    pub fn environments_for_project(&self, project: ProjectId) -> Vec<Environment> {
        self.read(|s| {
            s.environments
                .values()
                .filter(|e| e.project_id == project)
                .cloned()
                .collect()
        })
    }

    pub fn repos_for_project(&self, project: ProjectId) -> Vec<GitRepo> {
        self.read(|s| s.repos_for_project(project).into_iter().cloned().collect())
    }

    pub fn job(&self, id: JobId) -> Option<Job> {
        self.read(|s| s.jobs.get(&id).cloned())
    }

    pub fn jobs_for_project(&self, project: ProjectId) -> Vec<Job> {
        self.read(|s| s.jobs_for_project(project).into_iter().cloned().collect())
    }

    pub fn run(&self, id: RunId) -> Option<Run> {
        self.read(|s| s.runs.get(&id).cloned())
    }

    pub fn runs_for_job(&self, job: JobId) -> Vec<Run> {
        self.read(|s| s.runs_for_job(job).into_iter().cloned().collect())
    }

    pub fn event(&self, id: EventId) -> Option<Event> {
        self.read(|s| s.events.get(&id).cloned())
    }

    pub fn events_for_project(&self, project: ProjectId) -> Vec<Event> {
        self.read(|s| s.events_for_project(project).into_iter().cloned().collect())
    }

    pub fn events_for_job(&self, job: JobId) -> Vec<Event> {
        self.read(|s| s.events_for_job(job).into_iter().cloned().collect())
    }

    pub fn events_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        project: Option<ProjectId>,
    ) -> Vec<Event> {
        self.read(|s| {
            s.events_in_range(from, to, project)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    // -- writes --

    pub fn create_project(
        &self,
        name: &str,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Project, StoreError> {
        let mut inner = self.lock();
        let project = Project {
            id: ProjectId(inner.state.last_ids.project + 1),
            name: name.to_string(),
            description: None,
            color: Project::DEFAULT_COLOR.to_string(),
            status: ProjectStatus::Active,
            owner_id,
            created_at: now,
        };
        inner.commit(Operation::ProjectCreate {
            project: project.clone(),
        })?;
        Ok(project)
    }

    pub fn create_environment(
        &self,
        project_id: ProjectId,
        name: &str,
        kind: EnvironmentType,
    ) -> Result<Environment, StoreError> {
        let mut inner = self.lock();
        inner.require_project(project_id)?;
        let environment = Environment {
            id: EnvironmentId(inner.state.last_ids.environment + 1),
            project_id,
            name: name.to_string(),
            kind,
        };
        inner.commit(Operation::EnvironmentCreate {
            environment: environment.clone(),
        })?;
        Ok(environment)
    }

    pub fn create_repo(
        &self,
        project_id: ProjectId,
        name: &str,
        url: &str,
        default_branch: Option<&str>,
    ) -> Result<GitRepo, StoreError> {
        let mut inner = self.lock();
        inner.require_project(project_id)?;
        let repo = GitRepo {
            id: RepoId(inner.state.last_ids.repo + 1),
            project_id,
            name: name.to_string(),
            provider: GitProvider::from_url(url),
            url: url.to_string(),
            default_branch: default_branch
                .unwrap_or(GitRepo::DEFAULT_BRANCH)
                .to_string(),
            credentials_ref: None,
        };
        inner.commit(Operation::RepoCreate { repo: repo.clone() })?;
        Ok(repo)
    }

    pub fn create_job(&self, new: NewJob, now: DateTime<Utc>) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        inner.require_project(new.project_id)?;
        let job = new.into_job(JobId(inner.state.last_ids.job + 1), now);
        inner.commit(Operation::JobCreate { job: job.clone() })?;
        Ok(job)
    }

    /// Read-modify-write a job under the store lock.
    ///
    /// Nothing is written when `f` leaves the job unchanged.
    pub fn modify_job<T>(
        &self,
        id: JobId,
        f: impl FnOnce(&mut Job) -> T,
    ) -> Result<(Job, T), StoreError> {
        let mut inner = self.lock();
        let mut job = inner
            .state
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("job", id.get()))?;
        let before = job.clone();
        let out = f(&mut job);
        if job != before {
            inner.commit(Operation::JobUpdate { job: job.clone() })?;
        }
        Ok((job, out))
    }

    /// Delete a job together with its runs and mirrored events
    pub fn delete_job(&self, id: JobId) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        let job = inner
            .state
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("job", id.get()))?;
        inner.commit(Operation::JobDelete { id })?;
        Ok(job)
    }

    /// Record a new queued run of `job_id`
    pub fn create_run(&self, job_id: JobId, now: DateTime<Utc>) -> Result<Run, StoreError> {
        let mut inner = self.lock();
        if !inner.state.jobs.contains_key(&job_id) {
            return Err(StoreError::not_found("job", job_id.get()));
        }
        let run = Run::queued(RunId(inner.state.last_ids.run + 1), job_id, now);
        inner.commit(Operation::RunCreate { run: run.clone() })?;
        Ok(run)
    }

    pub fn update_run(&self, run: &Run) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if !inner.state.runs.contains_key(&run.id) {
            return Err(StoreError::not_found("run", run.id.get()));
        }
        inner.commit(Operation::RunUpdate { run: run.clone() })
    }

    /// Insert an event built around a freshly allocated id
    pub fn create_event(&self, build: impl FnOnce(EventId) -> Event) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        let event = build(EventId(inner.state.last_ids.event + 1));
        inner.require_project(event.project_id)?;
        inner.commit(Operation::EventCreate {
            event: event.clone(),
        })?;
        Ok(event)
    }

    pub fn update_event(&self, event: &Event) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if !inner.state.events.contains_key(&event.id) {
            return Err(StoreError::not_found("event", event.id.get()));
        }
        inner.commit(Operation::EventUpdate {
            event: event.clone(),
        })
    }

    pub fn delete_event(&self, id: EventId) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        let event = inner
            .state
            .events
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("event", id.get()))?;
        inner.commit(Operation::EventDelete { id })?;
        Ok(event)
    }

    /// Write a project's conflict flags as one log entry
    pub fn set_conflict_flags(
        &self,
        project_id: ProjectId,
        flags: Vec<(EventId, bool)>,
    ) -> Result<(), StoreError> {
        self.lock().commit(Operation::ConflictFlags { project_id, flags })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
