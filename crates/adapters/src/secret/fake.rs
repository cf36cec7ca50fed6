// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake secret store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Credential, DatabaseCredentials, SecretError, SecretStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded secret store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretCall {
    GetCredential { key: String },
    GetDatabaseCredentials,
}

#[derive(Default)]
struct FakeState {
    credentials: HashMap<String, Credential>,
    database: Option<DatabaseCredentials>,
    unreachable: bool,
    calls: Vec<SecretCall>,
}

/// In-memory secret store for testing
#[derive(Clone, Default)]
pub struct FakeSecretStore {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store a credential under `key`
    pub fn insert(&self, key: &str, credential: Credential) {
        self.state().credentials.insert(key.to_string(), credential);
    }

    pub fn set_database_credentials(&self, username: &str, password: &str) {
        self.state().database = Some(DatabaseCredentials {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    /// Simulate the store being down
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SecretCall> {
        self.state().calls.clone()
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn get_credential(&self, key: &str) -> Result<Credential, SecretError> {
        let mut state = self.state();
        state.calls.push(SecretCall::GetCredential {
            key: key.to_string(),
        });
        if state.unreachable {
            return Err(SecretError::Unreachable("fake store offline".to_string()));
        }
        state
            .credentials
            .get(key)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(key.to_string()))
    }

    async fn get_database_credentials(&self) -> Result<DatabaseCredentials, SecretError> {
        let mut state = self.state();
        state.calls.push(SecretCall::GetDatabaseCredentials);
        if state.unreachable {
            return Err(SecretError::Unreachable("fake store offline".to_string()));
        }
        state
            .database
            .clone()
            .ok_or_else(|| SecretError::NotFound("database".to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
