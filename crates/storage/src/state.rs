// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay
//!
//! Records are kept in id-ordered maps, so iteration order is insertion
//! order. Id counters only ever grow; deleted ids are not handed out again.

use chrono::{DateTime, Utc};
use opscal_core::{
    Environment, EnvironmentId, Event, EventId, GitRepo, Job, JobId, Operation, Project,
    ProjectId, RepoId, Run, RunId,
};
use std::collections::BTreeMap;

/// Highest id ever created, per entity kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LastIds {
    pub project: u64,
    pub environment: u64,
    pub repo: u64,
    pub job: u64,
    pub run: u64,
    pub event: u64,
}

/// Materialized state built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub projects: BTreeMap<ProjectId, Project>,
    pub environments: BTreeMap<EnvironmentId, Environment>,
    pub repos: BTreeMap<RepoId, GitRepo>,
    pub jobs: BTreeMap<JobId, Job>,
    pub runs: BTreeMap<RunId, Run>,
    pub events: BTreeMap<EventId, Event>,
    pub last_ids: LastIds,
}

impl MaterializedState {
    /// Repos attached to a project, oldest first
    pub fn repos_for_project(&self, project: ProjectId) -> Vec<&GitRepo> {
        self.repos
            .values()
            .filter(|r| r.project_id == project)
            .collect()
    }

    pub fn jobs_for_project(&self, project: ProjectId) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|j| j.project_id == project)
            .collect()
    }

    /// Runs of a job, newest first
    pub fn runs_for_job(&self, job: JobId) -> Vec<&Run> {
        self.runs
            .values()
            .rev()
            .filter(|r| r.job_id == job)
            .collect()
    }

    /// Events of a project in id order
    pub fn events_for_project(&self, project: ProjectId) -> Vec<&Event> {
        self.events
            .values()
            .filter(|e| e.project_id == project)
            .collect()
    }

    /// Events mirroring a job; more than one means a duplicate to clean up
    pub fn events_for_job(&self, job: JobId) -> Vec<&Event> {
        self.events
            .values()
            .filter(|e| e.job_id == Some(job))
            .collect()
    }

    /// Events starting within `[from, to]`, ordered by start then id
    pub fn events_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        project: Option<ProjectId>,
    ) -> Vec<&Event> {
        let mut events: Vec<&Event> = self
            .events
            .values()
            .filter(|e| project.is_none_or(|p| e.project_id == p))
            .filter(|e| from.is_none_or(|f| e.start >= f))
            .filter(|e| to.is_none_or(|t| e.start <= t))
            .collect();
        events.sort_by_key(|e| e.start);
        events
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::ProjectCreate { project } => {
                self.last_ids.project = self.last_ids.project.max(project.id.get());
                self.projects.insert(project.id, project.clone());
            }

            Operation::EnvironmentCreate { environment } => {
                self.last_ids.environment = self.last_ids.environment.max(environment.id.get());
                self.environments
                    .insert(environment.id, environment.clone());
            }

            Operation::RepoCreate { repo } => {
                self.last_ids.repo = self.last_ids.repo.max(repo.id.get());
                self.repos.insert(repo.id, repo.clone());
            }

            Operation::JobCreate { job } => {
                self.last_ids.job = self.last_ids.job.max(job.id.get());
                self.jobs.insert(job.id, job.clone());
            }

            Operation::JobUpdate { job } => {
                if let Some(existing) = self.jobs.get_mut(&job.id) {
                    *existing = job.clone();
                }
            }

            Operation::JobDelete { id } => {
                self.jobs.remove(id);
                self.runs.retain(|_, r| r.job_id != *id);
                self.events.retain(|_, e| e.job_id != Some(*id));
            }

            Operation::RunCreate { run } => {
                self.last_ids.run = self.last_ids.run.max(run.id.get());
                self.runs.insert(run.id, run.clone());
            }

            Operation::RunUpdate { run } => {
                if let Some(existing) = self.runs.get_mut(&run.id) {
                    *existing = run.clone();
                }
            }

            Operation::EventCreate { event } => {
                self.last_ids.event = self.last_ids.event.max(event.id.get());
                self.events.insert(event.id, event.clone());
            }

            Operation::EventUpdate { event } => {
                if let Some(existing) = self.events.get_mut(&event.id) {
                    *existing = event.clone();
                }
            }

            Operation::EventDelete { id } => {
                self.events.remove(id);
            }

            Operation::ConflictFlags { project_id, flags } => {
                for (id, conflict) in flags {
                    if let Some(event) = self.events.get_mut(id) {
                        if event.project_id == *project_id {
                            event.conflict = *conflict;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
