// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Projects, environments and attached git repositories
//!
//! These are read-only context for execution and conflict detection.

use crate::id::{EnvironmentId, ProjectId, RepoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Paused,
}

/// Scheduling and access-control context for jobs and events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub const DEFAULT_COLOR: &'static str = "#000000";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    Dev,
    Test,
    Staging,
    Prod,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub kind: EnvironmentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitProvider {
    Github,
    Gitlab,
    Gitea,
    #[default]
    Other,
}

impl GitProvider {
    /// Best-effort guess from the remote's host
    pub fn from_url(url: &str) -> Self {
        let url = url.to_ascii_lowercase();
        if url.contains("github.") {
            GitProvider::Github
        } else if url.contains("gitlab.") {
            GitProvider::Gitlab
        } else if url.contains("gitea.") {
            GitProvider::Gitea
        } else {
            GitProvider::Other
        }
    }
}

/// A git repository attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRepo {
    pub id: RepoId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub provider: GitProvider,
    pub url: String,
    pub default_branch: String,
    /// Secret-store key for fetch credentials, if the remote is private
    #[serde(default)]
    pub credentials_ref: Option<String>,
}

impl GitRepo {
    pub const DEFAULT_BRANCH: &'static str = "main";

    /// Deterministic checkout directory name for this repo within its project
    pub fn checkout_name(&self) -> String {
        format!("proj_{}_repo_{}", self.project_id, self.id)
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
