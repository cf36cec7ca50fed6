// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::repo::{RepoAdapter, RepoError};
use crate::secret::{Credential, DatabaseCredentials, SecretError, SecretStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Wrapper that adds tracing to any RepoAdapter
#[derive(Clone)]
pub struct TracedRepoAdapter<R> {
    inner: R,
}

impl<R> TracedRepoAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RepoAdapter> RepoAdapter for TracedRepoAdapter<R> {
    async fn clone_or_pull(&self, url: &str, name: &str) -> Result<PathBuf, RepoError> {
        let span = tracing::info_span!("repo.clone_or_pull", url, name);
        async {
            tracing::info!("fetching repository");

            let start = std::time::Instant::now();
            let result = self.inner.clone_or_pull(url, name).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(path) => tracing::info!(
                    path = %path.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "repository ready"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "fetch failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn checkout(&self, path: &Path, git_ref: &str) -> Result<(), RepoError> {
        let span = tracing::info_span!("repo.checkout", path = %path.display(), git_ref);
        async {
            // Precondition: the checkout must exist
            if !path.exists() {
                tracing::error!("checkout directory does not exist");
                return Err(RepoError::CheckoutFailed {
                    git_ref: git_ref.to_string(),
                    message: format!("checkout directory does not exist: {}", path.display()),
                });
            }

            let result = self.inner.checkout(path, git_ref).await;
            match &result {
                Ok(()) => tracing::info!("checked out"),
                Err(e) => tracing::error!(error = %e, "checkout failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any SecretStore
///
/// Only keys and outcomes are logged, never secret material.
#[derive(Clone)]
pub struct TracedSecretStore<S> {
    inner: S,
}

impl<S> TracedSecretStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SecretStore> SecretStore for TracedSecretStore<S> {
    async fn get_credential(&self, key: &str) -> Result<Credential, SecretError> {
        let span = tracing::info_span!("secret.get_credential", key);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.get_credential(key).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(cred) => tracing::info!(
                    elapsed_ms,
                    has_password = cred.password.is_some(),
                    has_private_key = cred.private_key.is_some(),
                    "credential resolved"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "credential lookup failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get_database_credentials(&self) -> Result<DatabaseCredentials, SecretError> {
        let span = tracing::info_span!("secret.get_database_credentials");
        async {
            let result = self.inner.get_database_credentials().await;
            match &result {
                Ok(creds) => tracing::info!(username = %creds.username, "database credentials issued"),
                Err(e) => tracing::error!(error = %e, "database credentials failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
