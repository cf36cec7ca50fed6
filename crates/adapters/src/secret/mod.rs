// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret store adapters
//!
//! Secret values never reach `Debug` output or logs.

mod vault;

pub use vault::{VaultConfig, VaultSecretStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSecretStore, SecretCall};

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors from secret store operations
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret store unreachable: {0}")]
    Unreachable(String),
    #[error("secret {0} not found")]
    NotFound(String),
    #[error("access to secret {0} denied")]
    Denied(String),
    #[error("malformed secret store response: {0}")]
    Malformed(String),
}

/// Login material stored under a credential key
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "privateKey")]
    pub private_key: Option<String>,
}

impl Credential {
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Short-lived database login issued by the secret store
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Adapter for reading secrets
#[async_trait]
pub trait SecretStore: Clone + Send + Sync + 'static {
    /// Read the credential stored under `key`
    async fn get_credential(&self, key: &str) -> Result<Credential, SecretError>;

    /// Issue dynamic database credentials
    async fn get_database_credentials(&self) -> Result<DatabaseCredentials, SecretError>;
}
