// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run a prepared command to completion and capture its output

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use opscal_core::{ExecutionResult, NO_EXIT_CODE};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

#[derive(Debug, Error)]
pub(crate) enum ProcessError {
    #[error("failed to spawn: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Stdin is closed so nothing can block on a prompt.
///
/// The child leads its own process group. When the deadline passes the whole
/// group is killed, so commands it started in turn die with it.
pub(crate) async fn run_to_end(
    mut cmd: Command,
    timeout: Duration,
) -> Result<ExecutionResult, ProcessError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(ProcessError::Spawn)?;
    let pid = child.id();
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    let collect = async {
        let (out, err, status) = tokio::join!(
            drain(stdout.as_mut()),
            drain(stderr.as_mut()),
            child.wait()
        );
        Ok::<_, std::io::Error>((out?, err?, status?))
    };
    let outcome = tokio::time::timeout(timeout, collect).await;

    let (out, err, status) = match outcome {
        Ok(result) => result.map_err(ProcessError::Spawn)?,
        Err(_) => {
            kill_group(pid);
            if let Err(e) = child.wait().await {
                tracing::warn!(error = %e, "failed to reap timed-out command");
            }
            return Err(ProcessError::Timeout(timeout));
        }
    };

    Ok(ExecutionResult {
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
        // Killed by a signal
        exit_code: status.code().unwrap_or(NO_EXIT_CODE),
    })
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn kill_group(pid: Option<u32>) {
    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    // The group id equals the leader's pid
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::warn!(pid, error = %e, "failed to kill process group");
    }
}
