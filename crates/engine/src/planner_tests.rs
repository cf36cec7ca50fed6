// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use opscal_core::{EventType, FakeClock, JobType};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
}

fn planner() -> (Planner<FakeClock>, ProjectId) {
    let clock = FakeClock::at(at(7, 0));
    let store = Store::in_memory();
    let planner = Planner::new(
        store.clone(),
        ConflictEngine::new(store, clock.clone()),
        clock,
    );
    let project = planner.create_project("infra", UserId(1)).unwrap().id;
    (planner, project)
}

fn scheduled(project: ProjectId, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> NewJob {
    NewJob::new(project, title, UserId(1)).with_schedule(Some(start), Some(end))
}

/// Scheduled jobs have exactly one matching mirror; others have none
fn assert_mirrors_hold(planner: &Planner<FakeClock>, project: ProjectId) {
    for job in planner.jobs(project).unwrap() {
        let mirrors: Vec<Event> = planner
            .calendar(None, None, Some(project))
            .unwrap()
            .into_iter()
            .filter(|e| e.job_id == Some(job.id))
            .collect();
        if job.is_scheduled() {
            assert_eq!(mirrors.len(), 1, "job {} mirrors", job.id);
            assert!(mirrors[0].mirrors(&job));
        } else {
            assert!(mirrors.is_empty(), "job {} is unscheduled", job.id);
        }
    }
}

#[tokio::test]
async fn scheduled_job_appears_on_calendar() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();

    let calendar = planner.calendar(None, None, Some(project)).unwrap();
    assert_eq!(calendar.len(), 1);
    assert_eq!(calendar[0].job_id, Some(job.id));
    assert_eq!(calendar[0].event_type, EventType::Job);
    assert_mirrors_hold(&planner, project);
}

#[tokio::test]
async fn unscheduled_job_stays_off_calendar() {
    let (planner, project) = planner();
    planner
        .create_job(NewJob::new(project, "backlog", UserId(1)))
        .await
        .unwrap();
    assert!(planner.calendar(None, None, None).unwrap().is_empty());
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let (planner, project) = planner();
    let err = planner
        .create_job(scheduled(project, "deploy", at(10, 0), at(9, 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow { .. }));
    assert!(planner.jobs(project).unwrap().is_empty());

    let err = planner
        .create_event(NewEvent::new(project, "x", at(10, 0)).ending(at(9, 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow { .. }));
}

#[tokio::test]
async fn unknown_project_is_rejected() {
    let (planner, _) = planner();
    let err = planner
        .create_job(NewJob::new(ProjectId(9), "x", UserId(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ProjectNotFound(ProjectId(9))));
    assert!(planner.add_repo(ProjectId(9), "r", "u", None).is_err());
}

#[tokio::test]
async fn clearing_planned_start_removes_mirror() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();

    let job = planner
        .update_job(
            job.id,
            JobPatch {
                planned_start: Some(None),
                planned_end: Some(None),
                ..JobPatch::default()
            },
        )
        .await
        .unwrap();

    assert!(!job.is_scheduled());
    assert!(planner.calendar(None, None, None).unwrap().is_empty());
    assert_mirrors_hold(&planner, project);
}

#[tokio::test]
async fn retitling_job_retitles_mirror() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();

    planner
        .update_job(
            job.id,
            JobPatch {
                title: Some("deploy api".into()),
                ..JobPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(planner.calendar(None, None, None).unwrap()[0].title, "deploy api");
    assert_mirrors_hold(&planner, project);
}

#[tokio::test]
async fn invalid_update_leaves_job_unchanged() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();

    let err = planner
        .update_job(
            job.id,
            JobPatch {
                planned_end: Some(Some(at(8, 0))),
                ..JobPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidWindow { .. }));
    assert_eq!(planner.job(job.id).unwrap(), job);
}

#[tokio::test]
async fn dragging_mirror_reschedules_job() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();
    let mirror = planner.calendar(None, None, None).unwrap().remove(0);

    let moved = planner
        .update_event(
            mirror.id,
            EventPatch {
                start: Some(at(13, 0)),
                end: Some(Some(at(14, 30))),
                color: Some(Some("#ff0000".into())),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.id, mirror.id);
    assert_eq!(moved.start, at(13, 0));
    assert_eq!(moved.color.as_deref(), Some("#ff0000"));
    let job = planner.job(job.id).unwrap();
    assert_eq!(job.planned_start, Some(at(13, 0)));
    assert_eq!(job.planned_end, Some(at(14, 30)));
    assert_mirrors_hold(&planner, project);
}

#[tokio::test]
async fn deleting_mirror_unschedules_job() {
    let (planner, project) = planner();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 0), at(10, 0)))
        .await
        .unwrap();
    let mirror = planner.calendar(None, None, None).unwrap().remove(0);

    let deleted = planner.delete_event(mirror.id).await.unwrap();

    assert_eq!(deleted.id, mirror.id);
    assert!(!planner.job(job.id).unwrap().is_scheduled());
    assert!(matches!(
        planner.event(mirror.id),
        Err(EngineError::EventNotFound(_))
    ));
    assert_mirrors_hold(&planner, project);
}

#[tokio::test]
async fn manual_events_drive_conflicts() {
    let (planner, project) = planner();
    let freeze = planner
        .create_event(NewEvent::new(project, "freeze", at(9, 0)).ending(at(12, 0)))
        .await
        .unwrap();
    assert!(freeze.job_id.is_none());
    assert!(!freeze.conflict);

    let job = planner
        .create_job(scheduled(project, "deploy", at(10, 0), at(11, 0)))
        .await
        .unwrap();
    assert!(planner.event(freeze.id).unwrap().conflict);
    assert_eq!(planner.conflicts(project).await.unwrap().len(), 2);

    // Moving the freeze out of the way clears both
    planner
        .update_event(
            freeze.id,
            EventPatch {
                start: Some(at(12, 0)),
                end: Some(Some(at(13, 0))),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(planner.conflicts(project).await.unwrap().is_empty());

    // Deleting the job clears its mirror as well
    planner.delete_job(job.id).await.unwrap();
    assert_eq!(planner.calendar(None, None, None).unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_job_clears_stale_conflicts() {
    let (planner, project) = planner();
    let meeting = planner
        .create_event(NewEvent::new(project, "sync", at(9, 0)).ending(at(10, 0)))
        .await
        .unwrap();
    let job = planner
        .create_job(scheduled(project, "deploy", at(9, 30), at(10, 30)))
        .await
        .unwrap();
    assert!(planner.event(meeting.id).unwrap().conflict);

    planner.delete_job(job.id).await.unwrap();

    assert!(!planner.event(meeting.id).unwrap().conflict);
    assert!(matches!(
        planner.job(job.id),
        Err(EngineError::JobNotFound(_))
    ));
}

#[tokio::test]
async fn calendar_filters_by_range_and_project() {
    let (planner, project) = planner();
    let other = planner.create_project("web", UserId(1)).unwrap().id;
    for (p, title, start) in [
        (project, "late", at(15, 0)),
        (project, "early", at(8, 0)),
        (other, "theirs", at(9, 0)),
        (project, "noon", at(12, 0)),
    ] {
        planner
            .create_event(NewEvent::new(p, title, start))
            .await
            .unwrap();
    }

    let titles = |events: Vec<Event>| events.into_iter().map(|e| e.title).collect::<Vec<_>>();
    assert_eq!(
        titles(planner.calendar(Some(at(8, 0)), Some(at(12, 0)), Some(project)).unwrap()),
        ["early", "noon"]
    );
    assert_eq!(
        titles(planner.calendar(None, None, None).unwrap()),
        ["early", "theirs", "noon", "late"]
    );
    assert!(planner.calendar(None, None, Some(ProjectId(99))).is_err());
}

#[tokio::test]
async fn run_history_requires_existing_job() {
    let (planner, _) = planner();
    assert!(matches!(
        planner.runs(JobId(5)),
        Err(EngineError::JobNotFound(JobId(5)))
    ));
    assert!(matches!(
        planner.run(RunId(5)),
        Err(EngineError::RunNotFound(RunId(5)))
    ));
}

#[tokio::test]
async fn job_environment_must_belong_to_its_project() {
    let (planner, project) = planner();
    let other = planner.create_project("web", UserId(1)).unwrap().id;
    let prod = planner
        .create_environment(project, "prod", EnvironmentType::Prod)
        .unwrap();
    let foreign = planner
        .create_environment(other, "staging", EnvironmentType::Staging)
        .unwrap();

    let mut new = NewJob::new(project, "deploy", UserId(1));
    new.environment_id = Some(prod.id);
    let job = planner.create_job(new.clone()).await.unwrap();
    assert_eq!(job.environment_id, Some(prod.id));

    new.environment_id = Some(EnvironmentId(42));
    assert!(matches!(
        planner.create_job(new.clone()).await,
        Err(EngineError::EnvironmentNotFound(EnvironmentId(42)))
    ));

    let patch = JobPatch {
        environment_id: Some(Some(foreign.id)),
        ..JobPatch::default()
    };
    let err = planner.update_job(job.id, patch).await.unwrap_err();
    assert!(matches!(err, EngineError::ForeignEnvironment { owner, .. } if owner == other));
    assert_eq!(planner.job(job.id).unwrap().environment_id, Some(prod.id));

    let cleared = JobPatch {
        environment_id: Some(None),
        ..JobPatch::default()
    };
    let job = planner.update_job(job.id, cleared).await.unwrap();
    assert_eq!(job.environment_id, None);
    assert_eq!(planner.environments(project).unwrap(), vec![prod]);
}

#[tokio::test]
async fn search_matches_case_insensitively_across_kinds() {
    let (planner, project) = planner();
    planner.create_project("Payments", UserId(1)).unwrap();

    let mut described = NewJob::new(project, "rotate keys", UserId(1));
    described.description = Some("Renew PAYMENT gateway certs".into());
    planner.create_job(described).await.unwrap();
    let mut typed = NewJob::new(project, "nightly", UserId(1));
    typed.job_type = JobType::Maintenance;
    planner.create_job(typed).await.unwrap();
    planner
        .create_event(NewEvent::new(project, "payment freeze", at(9, 0)))
        .await
        .unwrap();

    let hits = planner.search("payment");
    assert_eq!(hits.projects.len(), 1);
    assert_eq!(hits.projects[0].name, "Payments");
    assert_eq!(hits.jobs.len(), 1);
    assert_eq!(hits.jobs[0].title, "rotate keys");
    assert_eq!(hits.events.len(), 1);

    // Types match by name
    let hits = planner.search("MAINT");
    assert_eq!(hits.jobs.len(), 1);
    assert_eq!(hits.jobs[0].title, "nightly");

    assert!(planner.search("   ").is_empty());
    assert!(planner.search("nothing like it").is_empty());
}

#[tokio::test]
async fn search_caps_hits_per_kind() {
    let (planner, project) = planner();
    for i in 0..8 {
        planner
            .create_project(&format!("backup {}", i), UserId(1))
            .unwrap();
    }
    for i in 0..12 {
        planner
            .create_job(NewJob::new(project, format!("backup job {}", i), UserId(1)))
            .await
            .unwrap();
        planner
            .create_event(NewEvent::new(project, format!("backup window {}", i), at(i, 0)))
            .await
            .unwrap();
    }

    let hits = planner.search("backup");
    assert_eq!(hits.projects.len(), SEARCH_PROJECT_LIMIT);
    assert_eq!(hits.jobs.len(), SEARCH_JOB_LIMIT);
    assert_eq!(hits.events.len(), SEARCH_EVENT_LIMIT);
    assert_eq!(hits.jobs[0].title, "backup job 0");
}
