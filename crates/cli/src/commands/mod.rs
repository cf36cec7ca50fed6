// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod calendar;
pub mod environment;
pub mod event;
pub mod job;
pub mod project;
pub mod repo;
pub mod search;

use chrono::{DateTime, Utc};
use opscal_adapters::{GitAdapter, TracedRepoAdapter, TracedSecretStore, VaultSecretStore};
use opscal_core::SystemClock;
use opscal_engine::Runtime;

/// The runtime as the binary wires it
pub type App =
    Runtime<TracedSecretStore<VaultSecretStore>, TracedRepoAdapter<GitAdapter>, SystemClock>;

/// Timestamps on the command line are RFC 3339
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2026-06-01T09:00:00Z ({})", e))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
