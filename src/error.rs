//! Typed errors raised while scanning solver logs.
//!
//! Scanning failures are library errors (`thiserror`). Everything above the
//! scanner (config loading, rendering, the CLI) propagates `anyhow` errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single line failed the communication-record grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected 2 whitespace-bounded integers, found {found}")]
    IntegerTokenCount { found: usize },

    #[error("expected {expected} decimal numbers, found {found}")]
    FloatTokenCount { expected: usize, found: usize },

    #[error("cannot parse number {token:?}")]
    BadNumber { token: String },
}

/// Why a record violated the instrumentation contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedReason {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("communication sequence number {found}, expected {expected}")]
    SequenceMismatch { expected: u64, found: u64 },

    #[error(
        "communication numbering restarts at 1, expected {expected}; \
         set \"sequence_scope\": \"run\" if every log numbers its own run"
    )]
    NumberingRestart { expected: u64 },

    #[error("second completion record")]
    DuplicateCompletion,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("log file {} does not exist", .path.display())]
    MissingLogFile { path: PathBuf },

    #[error("malformed record at {}:{line}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: MalformedReason,
    },

    #[error("read log file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn is_missing_log(&self) -> bool {
        matches!(self, ScanError::MissingLogFile { .. })
    }

    /// Turn a sequence mismatch that restarts at 1 into [`MalformedReason::NumberingRestart`].
    pub fn into_restart_hint(self) -> Self {
        match self {
            ScanError::MalformedRecord {
                path,
                line,
                reason: MalformedReason::SequenceMismatch { expected, found: 1 },
            } if expected > 1 => ScanError::MalformedRecord {
                path,
                line,
                reason: MalformedReason::NumberingRestart { expected },
            },
            other => other,
        }
    }
}
