// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run transcript: orchestration notes plus captured output

use opscal_core::ExecutionResult;

pub const STDOUT_HEADER: &str = "--- STDOUT ---";
pub const STDERR_HEADER: &str = "--- STDERR ---";
pub const SYSTEM_ERROR_PREFIX: &str = "SYSTEM ERROR: ";

/// Line buffer owned by exactly one run
#[derive(Debug, Default, Clone)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append captured output; stderr gets a section only when non-empty
    pub fn output(&mut self, result: &ExecutionResult) {
        self.note(STDOUT_HEADER);
        self.note(result.stdout.clone());
        if !result.stderr.is_empty() {
            self.note(STDERR_HEADER);
            self.note(result.stderr.clone());
        }
    }

    /// Blank line, then the failure
    pub fn error(&mut self, message: &str) {
        self.note(format!("\n{}{}", SYSTEM_ERROR_PREFIX, message));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
#[path = "run_log_tests.rs"]
mod tests;
