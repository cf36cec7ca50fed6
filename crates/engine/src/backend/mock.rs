// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mock backend: replays canned tool transcripts for demos and tests

use super::ExecutionBackend;
use crate::error::RunError;
use async_trait::async_trait;
use opscal_core::{ExecutionResult, JobExecutionSpec, MockScenario, MOCK_PREFIX};
use std::time::Duration;

/// Width ansible pads its PLAY/TASK banners to
const BANNER_WIDTH: usize = 80;

fn banner(title: &str) -> String {
    let pad = BANNER_WIDTH.saturating_sub(title.len() + 1);
    format!("{} {}", title, "*".repeat(pad))
}

/// One burst of output followed by a pause of `pause` step delays
struct Step {
    lines: Vec<String>,
    pause: u32,
}

fn step(lines: &[&str], pause: u32) -> Step {
    Step {
        lines: lines.iter().map(|l| l.to_string()).collect(),
        pause,
    }
}

fn ansible() -> Vec<Step> {
    vec![
        Step {
            lines: vec![banner("PLAY [all]")],
            pause: 1,
        },
        Step {
            lines: vec![banner("TASK [Gathering Facts]"), "ok: [localhost]".into()],
            pause: 1,
        },
        Step {
            lines: vec![
                banner("TASK [Ensure Nginx is installed]"),
                "changed: [localhost]".into(),
            ],
            pause: 1,
        },
        Step {
            lines: vec![
                banner("TASK [Deploy Configuration]"),
                "ok: [localhost]".into(),
            ],
            pause: 1,
        },
        Step {
            lines: vec![
                banner("PLAY RECAP"),
                "localhost                  : ok=3    changed=1    unreachable=0    failed=0    skipped=0    rescued=0    ignored=0".into(),
            ],
            pause: 0,
        },
    ]
}

fn terraform() -> Vec<Step> {
    vec![
        step(&["Terraform will perform the following actions:"], 1),
        step(
            &[
                "  + resource \"aws_instance\" \"web\" {",
                "      + ami                          = \"ami-0c55b159cbfafe1f0\"",
                "      + instance_type                = \"t2.micro\"",
                "      + id                           = (known after apply)",
                "    }",
            ],
            2,
        ),
        step(&["Plan: 1 to add, 0 to change, 0 to destroy."], 0),
    ]
}

/// Replays a fixed transcript per scenario with artificial pauses
#[derive(Debug, Clone)]
pub struct MockBackend {
    step_delay: Duration,
}

impl MockBackend {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Known scenarios exit 0; anything else exits 1 with a diagnostic line
    pub async fn replay(&self, scenario: &MockScenario) -> ExecutionResult {
        let steps = match scenario {
            MockScenario::Ansible => ansible(),
            MockScenario::Terraform => terraform(),
            MockScenario::Unknown(name) => {
                return ExecutionResult {
                    stdout: format!("Unknown mock type: {}", name),
                    stderr: String::new(),
                    exit_code: 1,
                };
            }
        };

        let mut lines = Vec::new();
        for step in steps {
            lines.extend(step.lines);
            if step.pause > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay * step.pause).await;
            }
        }

        ExecutionResult {
            stdout: lines.join("\n"),
            stderr: String::new(),
            exit_code: 0,
        }
    }
}

#[async_trait]
impl ExecutionBackend for MockBackend {
    async fn execute(&self, spec: &JobExecutionSpec) -> Result<ExecutionResult, RunError> {
        let raw = spec
            .command
            .strip_prefix(MOCK_PREFIX)
            .unwrap_or(&spec.command);
        Ok(self.replay(&MockScenario::parse(raw)).await)
    }
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
