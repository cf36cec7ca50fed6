// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository fetch adapters

mod git;

pub use git::GitAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRepoAdapter, RepoCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from repo operations
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid checkout name: {0}")]
    InvalidName(String),
    #[error("git clone failed: {0}")]
    CloneFailed(String),
    #[error("git fetch failed: {0}")]
    FetchFailed(String),
    #[error("git checkout of {git_ref} failed: {message}")]
    CheckoutFailed { git_ref: String, message: String },
    #[error("git {command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for fetching project repositories
#[async_trait]
pub trait RepoAdapter: Clone + Send + Sync + 'static {
    /// Clone `url` into the checkout named `name`, or fetch if it already
    /// exists. Returns the checkout path.
    async fn clone_or_pull(&self, url: &str, name: &str) -> Result<PathBuf, RepoError>;

    /// Check out a branch, tag or commit in an existing checkout
    async fn checkout(&self, path: &Path, git_ref: &str) -> Result<(), RepoError>;
}

/// Checkout names become a single directory under the repos root
pub(crate) fn validate_name(name: &str) -> Result<(), RepoError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.starts_with('-');
    if bad {
        return Err(RepoError::InvalidName(name.to_string()));
    }
    Ok(())
}
