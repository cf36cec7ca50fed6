// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSH backend driving the system `ssh` client non-interactively

use super::process::{run_to_end, ProcessError};
use super::ExecutionBackend;
use crate::credentials::CredentialResolver;
use crate::error::RunError;
use async_trait::async_trait;
use opscal_adapters::{Credential, SecretStore};
use opscal_core::{ExecutionResult, JobExecutionSpec};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// `ssh` reserves this status for its own failures
const SSH_TRANSPORT_FAILURE: i32 = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Only hosts already in known_hosts
    #[default]
    Strict,
    /// Record unknown hosts on first contact, reject changed keys
    AcceptNew,
    /// No verification
    Insecure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub host_key_policy: HostKeyPolicy,
    pub known_hosts: Option<PathBuf>,
    pub default_user: String,
    pub program: String,
    pub sshpass_program: String,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host_key_policy: HostKeyPolicy::Strict,
            known_hosts: None,
            default_user: "root".to_string(),
            program: "ssh".to_string(),
            sshpass_program: "sshpass".to_string(),
        }
    }
}

/// How the client authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SshAuth {
    /// Password supplied by `sshpass` from the environment
    Password,
    KeyFile(PathBuf),
    /// Whatever the local agent or default identities provide
    Agent,
}

impl SshAuth {
    fn kind(&self) -> &'static str {
        match self {
            SshAuth::Password => "password",
            SshAuth::KeyFile(_) => "key",
            SshAuth::Agent => "agent",
        }
    }
}

/// Build the `ssh` argument list (program name excluded)
pub fn ssh_args(
    config: &SshConfig,
    auth: &SshAuth,
    user: &str,
    host: &str,
    command: &str,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let opt = |args: &mut Vec<String>, value: String| {
        args.push("-o".to_string());
        args.push(value);
    };

    let batch = if matches!(auth, SshAuth::Password) {
        "no"
    } else {
        "yes"
    };
    opt(&mut args, format!("BatchMode={}", batch));

    match config.host_key_policy {
        HostKeyPolicy::Strict => opt(&mut args, "StrictHostKeyChecking=yes".into()),
        HostKeyPolicy::AcceptNew => opt(&mut args, "StrictHostKeyChecking=accept-new".into()),
        HostKeyPolicy::Insecure => {
            opt(&mut args, "StrictHostKeyChecking=no".into());
            opt(&mut args, "UserKnownHostsFile=/dev/null".into());
        }
    }
    if config.host_key_policy != HostKeyPolicy::Insecure {
        if let Some(path) = &config.known_hosts {
            opt(&mut args, format!("UserKnownHostsFile={}", path.display()));
        }
    }

    match auth {
        SshAuth::Password => {
            opt(&mut args, "PreferredAuthentications=password,keyboard-interactive".into());
            opt(&mut args, "PubkeyAuthentication=no".into());
            opt(&mut args, "NumberOfPasswordPrompts=1".into());
        }
        SshAuth::KeyFile(path) => {
            opt(&mut args, "IdentitiesOnly=yes".into());
            args.push("-i".to_string());
            args.push(path.display().to_string());
        }
        SshAuth::Agent => {}
    }

    args.extend([
        "-l".to_string(),
        user.to_string(),
        "--".to_string(),
        host.to_string(),
        command.to_string(),
    ]);
    args
}

/// Runs the job command on `target_host` with credentials from the secret store
#[derive(Clone)]
pub struct SshBackend<S> {
    credentials: CredentialResolver<S>,
    config: SshConfig,
    timeout: Duration,
}

impl<S: SecretStore> SshBackend<S> {
    pub fn new(credentials: CredentialResolver<S>, config: SshConfig, timeout: Duration) -> Self {
        Self {
            credentials,
            config,
            timeout,
        }
    }

    fn user<'a>(&'a self, spec: &'a JobExecutionSpec, cred: &'a Credential) -> &'a str {
        spec.target_user
            .as_deref()
            .or(cred.username.as_deref().filter(|u| !u.trim().is_empty()))
            .unwrap_or(&self.config.default_user)
    }

    async fn connect(
        &self,
        spec: &JobExecutionSpec,
        host: &str,
        cred: &Credential,
    ) -> Result<ExecutionResult, RunError> {
        let user = self.user(spec, cred);
        let password = cred.password.as_deref().filter(|p| !p.is_empty());
        let key = cred.private_key.as_deref().filter(|k| !k.trim().is_empty());

        // Held until the process exits; dropping it removes the file
        let mut key_file: Option<NamedTempFile> = None;
        let auth = match (password, key) {
            (Some(_), _) => SshAuth::Password,
            (None, Some(pem)) => {
                let file = write_key(pem)
                    .map_err(|e| RunError::SshConnection(format!("private key: {}", e)))?;
                let path = file.path().to_path_buf();
                key_file = Some(file);
                SshAuth::KeyFile(path)
            }
            (None, None) => SshAuth::Agent,
        };

        tracing::debug!(host, user, auth = auth.kind(), "ssh connect");
        let args = ssh_args(&self.config, &auth, user, host, &spec.command);

        let cmd = match password {
            Some(password) => {
                let mut cmd = Command::new(&self.config.sshpass_program);
                cmd.arg("-e")
                    .arg(&self.config.program)
                    .args(&args)
                    .env("SSHPASS", password);
                cmd
            }
            None => {
                let mut cmd = Command::new(&self.config.program);
                cmd.args(&args);
                cmd
            }
        };

        let result = run_to_end(cmd, self.timeout).await;
        drop(key_file);

        let result = result.map_err(|e| match e {
            ProcessError::Spawn(err) => RunError::SshConnection(err.to_string()),
            ProcessError::Timeout(after) => RunError::Timeout(after),
        })?;

        if result.exit_code == SSH_TRANSPORT_FAILURE {
            let cause = result.stderr.trim();
            let cause = if cause.is_empty() {
                format!("ssh exited with status {}", SSH_TRANSPORT_FAILURE)
            } else {
                cause.to_string()
            };
            return Err(RunError::SshConnection(cause));
        }
        Ok(result)
    }
}

fn write_key(pem: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().prefix("opscal-key-").tempfile()?;
    restrict(file.path())?;
    file.write_all(pem.as_bytes())?;
    if !pem.ends_with('\n') {
        // OpenSSH rejects keys without a trailing newline
        file.write_all(b"\n")?;
    }
    file.flush()?;
    Ok(file)
}

#[cfg(unix)]
fn restrict(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl<S: SecretStore> ExecutionBackend for SshBackend<S> {
    async fn execute(&self, spec: &JobExecutionSpec) -> Result<ExecutionResult, RunError> {
        let key = spec
            .credential_key
            .as_deref()
            .ok_or(RunError::MissingCredential)?;
        let host = spec
            .target_host
            .as_deref()
            .ok_or(RunError::MissingTargetHost)?;
        if host.starts_with('-') {
            return Err(RunError::SshConnection(format!("invalid host: {}", host)));
        }

        let cred = self.credentials.resolve(key).await?;
        self.connect(spec, host, &cred).await
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
