// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar event commands
//!
//! Moving or removing a job's mirror event reschedules or unschedules the job.

use super::{parse_time, App};
use crate::output::{self, OutputFormat};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use opscal_core::{Event, EventId, EventPatch, EventType, NewEvent, ProjectId};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventCommand,
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Add a manual calendar entry
    Add {
        project: u64,
        title: String,
        #[arg(long, value_parser = parse_time)]
        start: DateTime<Utc>,
        /// Open-ended events occupy one hour
        #[arg(long, value_parser = parse_time)]
        end: Option<DateTime<Utc>>,
        #[arg(long = "type", value_enum, default_value_t = EventKind::Other)]
        kind: EventKind,
        /// Display colour, e.g. "#ff8800"
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        all_day: bool,
    },
    /// Move an event in time
    Move {
        event: u64,
        #[arg(long, value_parser = parse_time)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_time)]
        end: Option<DateTime<Utc>>,
    },
    /// Remove an event
    Rm { event: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventKind {
    Meeting,
    Maintenance,
    Incident,
    Other,
}

impl From<EventKind> for EventType {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Meeting => EventType::Meeting,
            EventKind::Maintenance => EventType::Maintenance,
            EventKind::Incident => EventType::Incident,
            EventKind::Other => EventType::Other,
        }
    }
}

pub(crate) fn event_header() -> String {
    format!(
        "  {:<6} {:<22} {:<22} {:<12} {}",
        "ID", "START", "END", "TYPE", "TITLE"
    )
}

/// One calendar line; `!` marks a conflict
#[derive(Serialize)]
#[serde(transparent)]
pub(crate) struct EventRow(pub Event);

impl fmt::Display for EventRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.0;
        write!(
            f,
            "{} {:<6} {:<22} {:<22} {:<12} {}",
            if e.conflict { "!" } else { " " },
            e.id.to_string(),
            output::time(Some(e.start)),
            output::time(e.end),
            e.event_type.to_string(),
            e.title
        )?;
        if let Some(job) = e.job_id {
            write!(f, " (job {})", job)?;
        }
        Ok(())
    }
}

pub async fn handle(args: EventArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let planner = app.planner();
    match args.command {
        EventCommand::Add {
            project,
            title,
            start,
            end,
            kind,
            color,
            all_day,
        } => {
            let mut new = NewEvent::new(ProjectId(project), title, start);
            new.end = end;
            new.event_type = kind.into();
            new.color = color;
            new.all_day = all_day;
            let event = planner.create_event(new).await?;
            print_event("Created event", event, format);
        }
        EventCommand::Move { event, start, end } => {
            if start.is_none() && end.is_none() {
                anyhow::bail!("nothing to move: pass --start and/or --end");
            }
            let patch = EventPatch {
                start,
                end: end.map(Some),
                ..EventPatch::default()
            };
            let event = planner.update_event(EventId(event), patch).await?;
            print_event("Moved event", event, format);
        }
        EventCommand::Rm { event } => {
            let event = planner.delete_event(EventId(event)).await?;
            match (format, event.job_id) {
                (OutputFormat::Text, Some(job)) => {
                    println!("Removed event {}; job {} is now unscheduled", event.id, job)
                }
                (OutputFormat::Text, None) => println!("Removed event {}", event.id),
                (OutputFormat::Json, _) => output::print(&EventRow(event), format),
            }
        }
    }
    Ok(())
}

fn print_event(verb: &str, event: Event, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{} {}", verb, event.id);
            println!("{}", EventRow(event));
        }
        OutputFormat::Json => output::print(&EventRow(event), format),
    }
}
