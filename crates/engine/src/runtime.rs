// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime wiring: one store, one set of collaborators, shared by the
//! planner and the run orchestrator

use crate::backend::{BackendConfig, Backends};
use crate::conflict::ConflictEngine;
use crate::git_context::GitContextBuilder;
use crate::orchestrator::RunOrchestrator;
use crate::planner::Planner;
use opscal_adapters::{RepoAdapter, SecretStore};
use opscal_core::Clock;
use opscal_storage::Store;
use std::path::PathBuf;

/// Runtime path and execution configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Working directory for runs of projects without a repository
    pub execution_root: PathBuf,
    pub backends: BackendConfig,
}

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, R> {
    pub store: Store,
    pub secrets: S,
    pub repos: R,
}

/// Everything an operator surface needs
pub struct Runtime<S, R, C> {
    planner: Planner<C>,
    orchestrator: RunOrchestrator<S, R, C>,
}

impl<S, R, C> Runtime<S, R, C>
where
    S: SecretStore,
    R: RepoAdapter,
    C: Clock,
{
    pub fn new(deps: RuntimeDeps<S, R>, clock: C, config: RuntimeConfig) -> Self {
        let conflicts = ConflictEngine::new(deps.store.clone(), clock.clone());
        let planner = Planner::new(deps.store.clone(), conflicts, clock.clone());
        let orchestrator = RunOrchestrator::new(
            deps.store,
            Backends::new(deps.secrets, &config.backends),
            GitContextBuilder::new(deps.repos, config.execution_root),
            clock,
        );
        Self {
            planner,
            orchestrator,
        }
    }

    pub fn planner(&self) -> &Planner<C> {
        &self.planner
    }

    pub fn orchestrator(&self) -> &RunOrchestrator<S, R, C> {
        &self.orchestrator
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
