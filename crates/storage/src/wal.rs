// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only operation log
//!
//! Each entry is one JSON line carrying a sequence number that must follow
//! its predecessor. An entry is fsynced before the mutation it records is
//! applied, so after a crash the log holds every acknowledged write plus at
//! most one unterminated line. Opening the log drops that torn tail.

use opscal_core::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt log entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("log entry at line {line} has sequence {found}, expected {expected}")]
    OutOfSequence {
        line: usize,
        expected: u64,
        found: u64,
    },
    #[error("cannot encode log entry: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct Entry {
    seq: u64,
    op: Operation,
}

/// Decoded prefix of a log file
#[derive(Debug, Default)]
struct Recovered {
    ops: Vec<Operation>,
    last_seq: u64,
    /// Byte length of the complete lines; anything after it is torn
    intact_len: usize,
}

fn recover(bytes: &[u8]) -> Result<Recovered, WalError> {
    let mut recovered = Recovered::default();
    for (idx, chunk) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
        if !chunk.ends_with(b"\n") {
            break;
        }
        recovered.intact_len += chunk.len();
        if chunk.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let line = idx + 1;
        let entry: Entry =
            serde_json::from_slice(chunk).map_err(|source| WalError::Corrupt { line, source })?;
        let expected = recovered.last_seq + 1;
        if entry.seq != expected {
            return Err(WalError::OutOfSequence {
                line,
                expected,
                found: entry.seq,
            });
        }
        recovered.last_seq = entry.seq;
        recovered.ops.push(entry.op);
    }
    Ok(recovered)
}

/// Writer half of the log, positioned after the last intact entry
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open (creating if needed) the log at `path` and return the operations
    /// it already holds, oldest first
    pub fn open(path: &Path) -> Result<(Self, Vec<Operation>), WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let recovered = recover(&bytes)?;

        if recovered.intact_len < bytes.len() {
            tracing::warn!(
                path = %path.display(),
                dropped_bytes = bytes.len() - recovered.intact_len,
                "discarding unterminated final log entry"
            );
            file.set_len(recovered.intact_len as u64)?;
            file.sync_all()?;
        }
        file.seek(SeekFrom::End(0))?;

        let wal = Self {
            file,
            sequence: recovered.last_seq,
        };
        Ok((wal, recovered.ops))
    }

    /// Durably record `op`; returns its sequence number
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        let seq = self.sequence + 1;
        let mut line = serde_json::to_vec(&Entry {
            seq,
            op: op.clone(),
        })
        .map_err(WalError::Encode)?;
        line.push(b'\n');

        // One write per entry keeps a crash from splitting it across lines
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        self.sequence = seq;
        Ok(seq)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
