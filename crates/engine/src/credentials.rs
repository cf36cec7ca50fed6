// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential resolution for backends that need secrets

use crate::error::RunError;
use opscal_adapters::{Credential, SecretStore};

/// Fetches credentials by key from an injected secret store.
///
/// Nothing is cached and nothing is retried.
#[derive(Clone)]
pub struct CredentialResolver<S> {
    store: S,
}

impl<S: SecretStore> CredentialResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A blank key never reaches the store
    pub async fn resolve(&self, key: &str) -> Result<Credential, RunError> {
        if key.trim().is_empty() {
            return Err(RunError::MissingCredential);
        }
        self.store
            .get_credential(key)
            .await
            .map_err(|source| RunError::CredentialUnavailable {
                key: key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
