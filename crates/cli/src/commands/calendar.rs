// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar views

use super::event::{event_header, EventRow};
use super::{parse_time, App};
use crate::output::{self, OutputFormat};
use chrono::{DateTime, Utc};
use clap::Args;
use opscal_core::ProjectId;

#[derive(Args)]
pub struct CalendarArgs {
    /// Only this project's events
    #[arg(long)]
    pub project: Option<u64>,
    /// Earliest start (inclusive)
    #[arg(long, value_parser = parse_time)]
    pub from: Option<DateTime<Utc>>,
    /// Latest start (inclusive)
    #[arg(long, value_parser = parse_time)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct ConflictsArgs {
    pub project: u64,
}

pub async fn calendar(args: CalendarArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<EventRow> = app
        .planner()
        .calendar(args.from, args.to, args.project.map(ProjectId))?
        .into_iter()
        .map(EventRow)
        .collect();
    output::print_list(&rows, &event_header(), "No events found.", format);
    Ok(())
}

pub async fn conflicts(args: ConflictsArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<EventRow> = app
        .planner()
        .conflicts(ProjectId(args.project))
        .await?
        .into_iter()
        .map(EventRow)
        .collect();
    output::print_list(&rows, &event_header(), "No conflicts.", format);
    Ok(())
}
