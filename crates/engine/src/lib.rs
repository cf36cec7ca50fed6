// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! opscal execution and calendar engine

pub mod backend;
mod conflict;
mod credentials;
mod error;
mod git_context;
mod locks;
mod orchestrator;
mod planner;
pub mod run_log;
mod runtime;

pub use backend::{BackendConfig, ExecutionBackend, HostKeyPolicy, SshConfig};
pub use conflict::ConflictEngine;
pub use credentials::CredentialResolver;
pub use error::{EngineError, RunError};
pub use git_context::GitContextBuilder;
pub use locks::KeyedLocks;
pub use orchestrator::RunOrchestrator;
pub use planner::{
    Planner, SearchResults, SEARCH_EVENT_LIMIT, SEARCH_JOB_LIMIT, SEARCH_PROJECT_LIMIT,
};
pub use run_log::RunLog;
pub use runtime::{Runtime, RuntimeConfig, RuntimeDeps};
