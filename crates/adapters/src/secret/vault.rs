// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HashiCorp Vault over its HTTP API
//!
//! Credentials are read from a KV v2 mount; database logins come from the
//! database secrets engine.

use super::{Credential, DatabaseCredentials, SecretError, SecretStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Connection settings for [`VaultSecretStore`]
#[derive(Clone)]
pub struct VaultConfig {
    pub addr: String,
    pub token: Option<String>,
    pub kv_mount: String,
    pub credentials_prefix: String,
    pub database_role: String,
    pub request_timeout: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: "http://127.0.0.1:8200".to_string(),
            token: None,
            kv_mount: "secret".to_string(),
            credentials_prefix: "credentials".to_string(),
            database_role: "opscal-backend".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("addr", &self.addr)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("kv_mount", &self.kv_mount)
            .field("credentials_prefix", &self.credentials_prefix)
            .field("database_role", &self.database_role)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// KV v2 read response: `{"data": {"data": {...}, "metadata": {...}}}`
#[derive(Deserialize)]
struct KvResponse<T> {
    data: KvData<T>,
}

#[derive(Deserialize)]
struct KvData<T> {
    data: T,
}

/// Logical read response: `{"data": {...}}`
#[derive(Deserialize)]
struct LogicalResponse<T> {
    data: T,
}

/// Vault-backed secret store, constructed once and shared by clones
#[derive(Clone, Debug)]
pub struct VaultSecretStore {
    client: reqwest::Client,
    config: Arc<VaultConfig>,
}

impl VaultSecretStore {
    pub fn new(config: VaultConfig) -> Result<Self, SecretError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SecretError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.addr.trim_end_matches('/'), path)
    }

    async fn read<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, SecretError> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| SecretError::Unreachable("no vault token configured".to_string()))?;

        let response = self
            .client
            .get(self.url(path))
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| SecretError::Unreachable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| SecretError::Malformed(e.to_string())),
            StatusCode::NOT_FOUND => Err(SecretError::NotFound(what.to_string())),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                Err(SecretError::Denied(what.to_string()))
            }
            status => Err(SecretError::Unreachable(format!(
                "vault returned {} for {}",
                status, what
            ))),
        }
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn get_credential(&self, key: &str) -> Result<Credential, SecretError> {
        if key.is_empty() || key.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(SecretError::NotFound(key.to_string()));
        }
        let path = format!(
            "{}/data/{}/{}",
            self.config.kv_mount, self.config.credentials_prefix, key
        );
        let body: KvResponse<Credential> = self.read(&path, key).await?;
        Ok(body.data.data)
    }

    async fn get_database_credentials(&self) -> Result<DatabaseCredentials, SecretError> {
        let path = format!("database/creds/{}", self.config.database_role);
        let body: LogicalResponse<DatabaseCredentials> =
            self.read(&path, &self.config.database_role).await?;
        Ok(body.data)
    }
}

#[cfg(test)]
#[path = "vault_tests.rs"]
mod tests;
