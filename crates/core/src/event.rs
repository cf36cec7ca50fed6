// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar events
//!
//! An event with a `job_id` is the calendar mirror of that job's schedule;
//! one without is a free-standing entry created by hand.

use crate::conflict::DEFAULT_EVENT_DURATION;
use crate::id::{EventId, JobId, ProjectId};
use crate::job::Job;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Job,
    Meeting,
    Maintenance,
    Incident,
    Other,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::Job => "job",
            EventType::Meeting => "meeting",
            EventType::Maintenance => "maintenance",
            EventType::Incident => "incident",
            EventType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    /// Derived: overlaps another event of the same project
    #[serde(default)]
    pub conflict: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// End of the occupied interval; open-ended events occupy one hour
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start + DEFAULT_EVENT_DURATION)
    }

    pub fn is_mirror(&self) -> bool {
        self.job_id.is_some()
    }

    /// Build the calendar mirror of a scheduled job.
    ///
    /// Returns `None` when the job has no planned start.
    pub fn mirror_of(job: &Job, id: EventId, now: DateTime<Utc>) -> Option<Self> {
        let start = job.planned_start?;
        Some(Self {
            id,
            project_id: job.project_id,
            job_id: Some(job.id),
            title: job.title.clone(),
            start,
            end: job.planned_end,
            event_type: EventType::Job,
            color: None,
            all_day: job.all_day,
            conflict: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Copy the job's mirrored fields onto this event.
    ///
    /// Returns false (leaving the event untouched) when the job is unscheduled.
    pub fn copy_from_job(&mut self, job: &Job, now: DateTime<Utc>) -> bool {
        let Some(start) = job.planned_start else {
            return false;
        };
        self.project_id = job.project_id;
        self.job_id = Some(job.id);
        self.title = job.title.clone();
        self.start = start;
        self.end = job.planned_end;
        self.event_type = EventType::Job;
        self.all_day = job.all_day;
        self.updated_at = now;
        true
    }

    /// Whether the mirrored fields currently equal the job's
    pub fn mirrors(&self, job: &Job) -> bool {
        self.job_id == Some(job.id)
            && Some(self.start) == job.planned_start
            && self.end == job.planned_end
            && self.title == job.title
            && self.all_day == job.all_day
    }
}

/// Input for a manually created calendar entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub project_id: ProjectId,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default = "default_manual_type")]
    pub event_type: EventType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub all_day: bool,
}

fn default_manual_type() -> EventType {
    EventType::Other
}

impl NewEvent {
    pub fn new(project_id: ProjectId, title: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            project_id,
            title: title.into(),
            start,
            end: None,
            event_type: EventType::Other,
            color: None,
            all_day: false,
        }
    }

    pub fn ending(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn into_event(self, id: EventId, now: DateTime<Utc>) -> Event {
        Event {
            id,
            project_id: self.project_id,
            job_id: None,
            title: self.title,
            start: self.start,
            end: self.end,
            event_type: self.event_type,
            color: self.color,
            all_day: self.all_day,
            conflict: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an event (e.g. drag-and-drop rescheduling)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<Option<DateTime<Utc>>>,
    pub all_day: Option<bool>,
    pub color: Option<Option<String>>,
}

impl EventPatch {
    /// Whether the patch moves the event in time
    pub fn moves(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn apply(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(v) = self.title {
            event.title = v;
        }
        if let Some(v) = self.start {
            event.start = v;
        }
        if let Some(v) = self.end {
            event.end = v;
        }
        if let Some(v) = self.all_day {
            event.all_day = v;
        }
        if let Some(v) = self.color {
            event.color = v;
        }
        event.updated_at = now;
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
