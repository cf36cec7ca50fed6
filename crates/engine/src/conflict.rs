// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-to-calendar mirroring and per-project conflict flags
//!
//! A scheduled job owns exactly one mirror event carrying its title,
//! window and all-day flag; an unscheduled job owns none. Every change to
//! a project's events ends with a recompute of that project's flags.

use crate::error::EngineError;
use crate::locks::KeyedLocks;
use opscal_core::{conflict_flags, Clock, Event, EventId, Job, JobId, ProjectId};
use opscal_storage::Store;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

struct Inner<C> {
    store: Store,
    clock: C,
    projects: KeyedLocks<ProjectId>,
}

/// Keeps mirror events and conflict flags consistent, one project at a time
pub struct ConflictEngine<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for ConflictEngine<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> ConflictEngine<C> {
    pub fn new(store: Store, clock: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                clock,
                projects: KeyedLocks::new(),
            }),
        }
    }

    /// Bring the job's mirror event in line with the job, then recompute
    /// the project's conflicts. Returns the mirror, if the job is scheduled.
    pub async fn sync_job_event(&self, job: &Job) -> Result<Option<Event>, EngineError> {
        let _guard = self.lock(job.project_id).await;
        self.sync_locked(job.id, job.project_id)
    }

    /// Recompute and persist the conflict flags of every event in `project`
    pub async fn recompute_conflicts(&self, project: ProjectId) -> Result<Vec<Event>, EngineError> {
        if self.inner.store.project(project).is_none() {
            return Err(EngineError::ProjectNotFound(project));
        }
        let _guard = self.lock(project).await;
        self.recompute_locked(project)
    }

    /// Serialize mutations of one project's calendar
    pub(crate) async fn lock(&self, project: ProjectId) -> OwnedMutexGuard<()> {
        self.inner.projects.lock(project).await
    }

    /// Caller holds the project lock.
    ///
    /// The job is re-read so a stale copy never overwrites a newer schedule.
    pub(crate) fn sync_locked(
        &self,
        job_id: JobId,
        project: ProjectId,
    ) -> Result<Option<Event>, EngineError> {
        let store = &self.inner.store;
        let now = self.inner.clock.now();
        let mut mirrors = store.events_for_job(job_id).into_iter();

        let synced = match store.job(job_id).filter(Job::is_scheduled) {
            None => {
                for mirror in mirrors {
                    store.delete_event(mirror.id)?;
                    tracing::debug!(job_id = %job_id, event_id = %mirror.id, "mirror removed");
                }
                None
            }
            Some(job) => {
                let event = match mirrors.next() {
                    Some(mut event) => {
                        if !event.mirrors(&job) && event.copy_from_job(&job, now) {
                            store.update_event(&event)?;
                        }
                        event
                    }
                    None => self.create_mirror(&job, now)?,
                };
                // More than one mirror can only come from an interrupted writer
                for extra in mirrors {
                    store.delete_event(extra.id)?;
                }
                Some(event.id)
            }
        };

        self.recompute_locked(project)?;
        Ok(synced.and_then(|id| store.event(id)))
    }

    fn create_mirror(
        &self,
        job: &Job,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Event, EngineError> {
        let Some(template) = Event::mirror_of(job, EventId(0), now) else {
            return Err(EngineError::JobNotFound(job.id));
        };
        let event = self
            .inner
            .store
            .create_event(|id| Event { id, ..template })?;
        tracing::debug!(job_id = %job.id, event_id = %event.id, "mirror created");
        Ok(event)
    }

    /// Caller holds the project lock
    pub(crate) fn recompute_locked(&self, project: ProjectId) -> Result<Vec<Event>, EngineError> {
        let store = &self.inner.store;
        // Id order doubles as insertion order for start-time ties
        let events = store.events_for_project(project);
        let flags = conflict_flags(&events);

        let changed = events
            .iter()
            .zip(&flags)
            .filter(|(event, (_, flag))| event.conflict != *flag)
            .count();
        if changed > 0 {
            store.set_conflict_flags(project, flags)?;
        }
        tracing::debug!(
            project_id = %project,
            events = events.len(),
            changed,
            "conflicts recomputed"
        );
        Ok(store.events_for_project(project))
    }
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
