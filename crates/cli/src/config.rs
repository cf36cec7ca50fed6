// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file and state directory resolution

use anyhow::{Context, Result};
use opscal_adapters::VaultConfig;
use opscal_engine::{BackendConfig, RuntimeConfig, SshConfig};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the state directory (store, log, checkouts)
pub const STATE_DIR_ENV: &str = "OPSCAL_STATE_DIR";

/// Fallback for `[vault] token`
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub execution: ExecutionSection,
    pub ssh: SshConfig,
    pub vault: VaultSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionSection {
    /// Wall-clock bound for shell and ssh runs
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Pause between the steps of a mock transcript
    #[serde(with = "humantime_serde")]
    pub mock_step_delay: Duration,
    /// Default: `<state>/execution`
    pub execution_root: Option<PathBuf>,
    /// Default: `<state>/repos`
    pub repos_root: Option<PathBuf>,
    #[serde(with = "humantime_serde")]
    pub git_timeout: Duration,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        let backends = BackendConfig::default();
        Self {
            timeout: backends.timeout,
            mock_step_delay: backends.mock_step_delay,
            execution_root: None,
            repos_root: None,
            git_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultSection {
    pub addr: String,
    pub token: Option<String>,
    pub kv_mount: String,
    pub credentials_prefix: String,
    pub database_role: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for VaultSection {
    fn default() -> Self {
        let vault = VaultConfig::default();
        Self {
            addr: vault.addr,
            token: None,
            kv_mount: vault.kv_mount,
            credentials_prefix: vault.credentials_prefix,
            database_role: vault.database_role,
            request_timeout: vault.request_timeout,
        }
    }
}

impl VaultSection {
    /// A token in the file wins over the environment
    pub fn into_vault_config(self, env_token: Option<String>) -> VaultConfig {
        VaultConfig {
            addr: self.addr,
            token: self.token.or(env_token).filter(|t| !t.trim().is_empty()),
            kv_mount: self.kv_mount,
            credentials_prefix: self.credentials_prefix,
            database_role: self.database_role,
            request_timeout: self.request_timeout,
        }
    }
}

impl Config {
    /// Load `explicit` if given, else the default location. Only an
    /// explicitly named file has to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn execution_root(&self, state_dir: &Path) -> PathBuf {
        self.execution
            .execution_root
            .clone()
            .unwrap_or_else(|| state_dir.join("execution"))
    }

    pub fn repos_root(&self, state_dir: &Path) -> PathBuf {
        self.execution
            .repos_root
            .clone()
            .unwrap_or_else(|| state_dir.join("repos"))
    }

    pub fn runtime_config(&self, state_dir: &Path) -> RuntimeConfig {
        RuntimeConfig {
            execution_root: self.execution_root(state_dir),
            backends: BackendConfig {
                timeout: self.execution.timeout,
                mock_step_delay: self.execution.mock_step_delay,
                ssh: self.ssh.clone(),
            },
        }
    }
}

/// `<config_dir>/opscal/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("opscal").join("config.toml"))
}

/// `$OPSCAL_STATE_DIR`, else `<data_local_dir>/opscal`
pub fn state_dir() -> Result<PathBuf> {
    resolve_state_dir(std::env::var_os(STATE_DIR_ENV), dirs::data_local_dir())
}

fn resolve_state_dir(env: Option<OsString>, data_local: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = env.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    data_local
        .map(|dir| dir.join("opscal"))
        .with_context(|| format!("no local data directory; set {}", STATE_DIR_ENV))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
