// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and calendar mutations
//!
//! Every mutation runs under its project's lock and ends with a mirror sync
//! or a conflict recompute, so the calendar never shows a job at a time the
//! job does not have.

use crate::conflict::ConflictEngine;
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use opscal_core::{
    Clock, Environment, EnvironmentId, EnvironmentType, Event, EventId, EventPatch, GitRepo, Job,
    JobId, JobPatch, NewEvent, NewJob, Project, ProjectId, Run, RunId, UserId,
};
use opscal_storage::Store;
use serde::Serialize;

/// Per-kind caps on search hits
pub const SEARCH_PROJECT_LIMIT: usize = 5;
pub const SEARCH_JOB_LIMIT: usize = 10;
pub const SEARCH_EVENT_LIMIT: usize = 5;

/// Hits of a cross-entity search, each list in id order
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub jobs: Vec<Job>,
    pub events: Vec<Event>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.jobs.is_empty() && self.events.is_empty()
    }
}

/// Case-insensitive substring match; `needle` is already lowercased
fn contains_any<'a>(needle: &str, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn check_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), EngineError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(EngineError::InvalidWindow { start, end }),
        _ => Ok(()),
    }
}

/// Entry point for everything that edits projects, jobs or events
#[derive(Clone)]
pub struct Planner<C> {
    store: Store,
    conflicts: ConflictEngine<C>,
    clock: C,
}

impl<C: Clock> Planner<C> {
    pub fn new(store: Store, conflicts: ConflictEngine<C>, clock: C) -> Self {
        Self {
            store,
            conflicts,
            clock,
        }
    }

    fn require_project(&self, id: ProjectId) -> Result<Project, EngineError> {
        self.store.project(id).ok_or(EngineError::ProjectNotFound(id))
    }

    // -- projects --

    pub fn create_project(&self, name: &str, owner: UserId) -> Result<Project, EngineError> {
        let project = self.store.create_project(name, owner, self.clock.now())?;
        tracing::info!(project_id = %project.id, name, "project created");
        Ok(project)
    }

    pub fn projects(&self) -> Vec<Project> {
        self.store.projects()
    }

    /// Attach a repository; the first one attached is the one runs check out
    pub fn add_repo(
        &self,
        project: ProjectId,
        name: &str,
        url: &str,
        default_branch: Option<&str>,
    ) -> Result<GitRepo, EngineError> {
        self.require_project(project)?;
        let repo = self.store.create_repo(project, name, url, default_branch)?;
        tracing::info!(project_id = %project, repo_id = %repo.id, "repo attached");
        Ok(repo)
    }

    pub fn create_environment(
        &self,
        project: ProjectId,
        name: &str,
        kind: EnvironmentType,
    ) -> Result<Environment, EngineError> {
        self.require_project(project)?;
        let environment = self.store.create_environment(project, name, kind)?;
        tracing::info!(project_id = %project, environment_id = %environment.id, "environment created");
        Ok(environment)
    }

    pub fn environments(&self, project: ProjectId) -> Result<Vec<Environment>, EngineError> {
        self.require_project(project)?;
        Ok(self.store.environments_for_project(project))
    }

    /// A job may only target an environment of its own project
    fn check_environment(
        &self,
        project: ProjectId,
        environment: Option<EnvironmentId>,
    ) -> Result<(), EngineError> {
        let Some(id) = environment else {
            return Ok(());
        };
        let env = self
            .store
            .environment(id)
            .ok_or(EngineError::EnvironmentNotFound(id))?;
        if env.project_id != project {
            return Err(EngineError::ForeignEnvironment {
                environment: id,
                owner: env.project_id,
                project,
            });
        }
        Ok(())
    }

    pub fn repos(&self, project: ProjectId) -> Result<Vec<GitRepo>, EngineError> {
        self.require_project(project)?;
        Ok(self.store.repos_for_project(project))
    }

    // -- jobs --

    pub async fn create_job(&self, new: NewJob) -> Result<Job, EngineError> {
        self.require_project(new.project_id)?;
        self.check_environment(new.project_id, new.environment_id)?;
        check_window(new.planned_start, new.planned_end)?;

        let _guard = self.conflicts.lock(new.project_id).await;
        let job = self.store.create_job(new, self.clock.now())?;
        self.conflicts.sync_locked(job.id, job.project_id)?;
        tracing::info!(job_id = %job.id, scheduled = job.is_scheduled(), "job created");
        Ok(job)
    }

    /// Apply a partial update. Clearing `planned_start` takes the job off the
    /// calendar.
    pub async fn update_job(&self, id: JobId, patch: JobPatch) -> Result<Job, EngineError> {
        let project = self.job(id)?.project_id;
        if let Some(environment) = patch.environment_id {
            self.check_environment(project, environment)?;
        }
        let _guard = self.conflicts.lock(project).await;

        let now = self.clock.now();
        let (job, outcome) = self.store.modify_job(id, |job| {
            let mut next = job.clone();
            let mirrored = patch.apply(&mut next, now);
            check_window(next.planned_start, next.planned_end)?;
            *job = next;
            Ok::<bool, EngineError>(mirrored)
        })?;
        if outcome? {
            self.conflicts.sync_locked(id, project)?;
        }
        tracing::info!(job_id = %id, "job updated");
        Ok(job)
    }

    /// Delete a job with its runs and mirror event
    pub async fn delete_job(&self, id: JobId) -> Result<Job, EngineError> {
        let project = self.job(id)?.project_id;
        let _guard = self.conflicts.lock(project).await;

        let job = self.store.delete_job(id)?;
        self.conflicts.recompute_locked(project)?;
        tracing::info!(job_id = %id, "job deleted");
        Ok(job)
    }

    pub fn job(&self, id: JobId) -> Result<Job, EngineError> {
        self.store.job(id).ok_or(EngineError::JobNotFound(id))
    }

    pub fn jobs(&self, project: ProjectId) -> Result<Vec<Job>, EngineError> {
        self.require_project(project)?;
        Ok(self.store.jobs_for_project(project))
    }

    /// Run history of a job, newest first
    pub fn runs(&self, job: JobId) -> Result<Vec<Run>, EngineError> {
        self.job(job)?;
        Ok(self.store.runs_for_job(job))
    }

    pub fn run(&self, id: RunId) -> Result<Run, EngineError> {
        self.store.run(id).ok_or(EngineError::RunNotFound(id))
    }

    // -- events --

    /// Create a manual calendar entry (never linked to a job)
    pub async fn create_event(&self, new: NewEvent) -> Result<Event, EngineError> {
        self.require_project(new.project_id)?;
        check_window(Some(new.start), new.end)?;

        let project = new.project_id;
        let _guard = self.conflicts.lock(project).await;
        let now = self.clock.now();
        let event = self.store.create_event(|id| new.into_event(id, now))?;
        self.conflicts.recompute_locked(project)?;
        tracing::info!(event_id = %event.id, "event created");
        self.event(event.id)
    }

    /// Edit an event. Moving a mirror reschedules its job, and the mirror
    /// is then resynced from the job.
    pub async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event, EngineError> {
        let project = self.event(id)?.project_id;
        let _guard = self.conflicts.lock(project).await;
        let mut event = self.event(id)?;
        let now = self.clock.now();

        match event.job_id {
            None => {
                patch.apply(&mut event, now);
                check_window(Some(event.start), event.end)?;
                self.store.update_event(&event)?;
                self.conflicts.recompute_locked(project)?;
            }
            Some(job_id) => {
                let EventPatch {
                    title,
                    start,
                    end,
                    all_day,
                    color,
                } = patch;
                check_window(Some(start.unwrap_or(event.start)), end.unwrap_or(event.end))?;

                let write_back = JobPatch {
                    title,
                    planned_start: start.map(Some),
                    planned_end: end,
                    all_day,
                    ..JobPatch::default()
                };
                if write_back != JobPatch::default() {
                    self.store
                        .modify_job(job_id, |job| write_back.apply(job, now))?;
                }
                if let Some(color) = color {
                    event.color = color;
                    event.updated_at = now;
                    self.store.update_event(&event)?;
                }
                self.conflicts.sync_locked(job_id, project)?;
                tracing::debug!(job_id = %job_id, event_id = %id, "mirror edit written back to job");
            }
        }
        self.event(id)
    }

    /// Delete an event. Deleting a mirror unschedules its job.
    pub async fn delete_event(&self, id: EventId) -> Result<Event, EngineError> {
        let project = self.event(id)?.project_id;
        let _guard = self.conflicts.lock(project).await;
        let event = self.event(id)?;

        match event.job_id {
            None => {
                self.store.delete_event(id)?;
                self.conflicts.recompute_locked(project)?;
            }
            Some(job_id) => {
                let now = self.clock.now();
                self.store.modify_job(job_id, |job| {
                    job.planned_start = None;
                    job.planned_end = None;
                    job.updated_at = now;
                })?;
                self.conflicts.sync_locked(job_id, project)?;
            }
        }
        tracing::info!(event_id = %id, mirror = event.is_mirror(), "event deleted");
        Ok(event)
    }

    pub fn event(&self, id: EventId) -> Result<Event, EngineError> {
        self.store.event(id).ok_or(EngineError::EventNotFound(id))
    }

    /// Events starting within `[from, to]`, ordered by start
    pub fn calendar(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        project: Option<ProjectId>,
    ) -> Result<Vec<Event>, EngineError> {
        if let Some(project) = project {
            self.require_project(project)?;
        }
        Ok(self.store.events_in_range(from, to, project))
    }

    /// Case-insensitive substring search over projects (name, description),
    /// jobs (title, description, type) and events (title, type).
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }
        let needle = needle.as_str();

        self.store.read(|s| SearchResults {
            projects: s
                .projects
                .values()
                .filter(|p| {
                    contains_any(needle, [Some(p.name.as_str()), p.description.as_deref()])
                })
                .take(SEARCH_PROJECT_LIMIT)
                .cloned()
                .collect(),
            jobs: s
                .jobs
                .values()
                .filter(|j| {
                    let kind = j.job_type.to_string();
                    contains_any(
                        needle,
                        [
                            Some(j.title.as_str()),
                            j.description.as_deref(),
                            Some(kind.as_str()),
                        ],
                    )
                })
                .take(SEARCH_JOB_LIMIT)
                .cloned()
                .collect(),
            events: s
                .events
                .values()
                .filter(|e| {
                    let kind = e.event_type.to_string();
                    contains_any(needle, [Some(e.title.as_str()), Some(kind.as_str())])
                })
                .take(SEARCH_EVENT_LIMIT)
                .cloned()
                .collect(),
        })
    }

    /// Recompute a project's flags and return the events that conflict
    pub async fn conflicts(&self, project: ProjectId) -> Result<Vec<Event>, EngineError> {
        let events = self.conflicts.recompute_conflicts(project).await?;
        Ok(events.into_iter().filter(|e| e.conflict).collect())
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
