// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Search across projects, jobs and calendar events

use super::App;
use crate::output::{self, OutputFormat};
use clap::Args;
use opscal_engine::SearchResults;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,
}

#[derive(Serialize)]
#[serde(transparent)]
struct Hits(SearchResults);

impl fmt::Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hits = &self.0;
        if hits.is_empty() {
            return write!(f, "No matches.");
        }
        let mut lines = Vec::new();
        for p in &hits.projects {
            lines.push(format!("project {:<6} {}", p.id.to_string(), p.name));
        }
        for j in &hits.jobs {
            lines.push(format!(
                "job     {:<6} {} [{}]",
                j.id.to_string(),
                j.title,
                j.status
            ));
        }
        for e in &hits.events {
            lines.push(format!(
                "event   {:<6} {} ({} on {})",
                e.id.to_string(),
                e.title,
                e.event_type,
                e.start.format("%Y-%m-%d")
            ));
        }
        write!(f, "{}", lines.join("\n"))
    }
}

pub async fn handle(args: SearchArgs, app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let hits = app.planner().search(&args.query);
    tracing::debug!(
        projects = hits.projects.len(),
        jobs = hits.jobs.len(),
        events = hits.events.len(),
        "search"
    );
    output::print(&Hits(hits), format);
    Ok(())
}
