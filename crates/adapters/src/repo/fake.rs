// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake repository adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{validate_name, RepoAdapter, RepoError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded repo call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    CloneOrPull { url: String, name: String },
    Checkout { path: PathBuf, git_ref: String },
}

#[derive(Default)]
struct Failures {
    clone: Option<String>,
    checkout: Option<String>,
}

/// Fake repository adapter for testing
///
/// "Clones" by creating an empty directory under its root.
#[derive(Clone)]
pub struct FakeRepoAdapter {
    root: PathBuf,
    calls: Arc<Mutex<Vec<RepoCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl FakeRepoAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            calls: Arc::default(),
            failures: Arc::default(),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every subsequent clone fail with `message`
    pub fn fail_clone(&self, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone = Some(message.to_string());
    }

    /// Make every subsequent checkout fail with `message`
    pub fn fail_checkout(&self, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .checkout = Some(message.to_string());
    }

    fn record(&self, call: RepoCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl RepoAdapter for FakeRepoAdapter {
    async fn clone_or_pull(&self, url: &str, name: &str) -> Result<PathBuf, RepoError> {
        self.record(RepoCall::CloneOrPull {
            url: url.to_string(),
            name: name.to_string(),
        });
        validate_name(name)?;

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone
            .clone();
        if let Some(message) = failure {
            return Err(RepoError::CloneFailed(message));
        }

        let path = self.root.join(name);
        std::fs::create_dir_all(&path).map_err(|e| RepoError::CommandFailed(e.to_string()))?;
        Ok(path)
    }

    async fn checkout(&self, path: &Path, git_ref: &str) -> Result<(), RepoError> {
        self.record(RepoCall::Checkout {
            path: path.to_path_buf(),
            git_ref: git_ref.to_string(),
        });

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .checkout
            .clone();
        match failure {
            Some(message) => Err(RepoError::CheckoutFailed {
                git_ref: git_ref.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
