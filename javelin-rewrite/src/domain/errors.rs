//! Per-file errors raised by scanning and rewriting
//!
//! These never abort a run. Engines collect them into the `skipped` list of
//! their reports and move on to the next file.

use std::path::PathBuf;
use thiserror::Error;

use crate::infrastructure::encoding::SourceReadError;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Skipping binary file {}", path.display())]
    Binary { path: PathBuf },

    #[error("Rule {rule_id} has an invalid pattern: {source}")]
    Pattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },
}

impl ScanError {
    pub fn from_read(path: PathBuf, error: SourceReadError) -> Self {
        match error {
            SourceReadError::Io(source) => Self::Read { path, source },
            SourceReadError::Binary => Self::Binary { path },
        }
    }
}

#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Skipping binary file {}", path.display())]
    Binary { path: PathBuf },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot convert {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: javelin_deps::ParseError,
    },

    #[error("Rule {rule_id} has an invalid pattern: {source}")]
    Pattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },
}

impl TransformationError {
    pub fn from_read(path: PathBuf, error: SourceReadError) -> Self {
        match error {
            SourceReadError::Io(source) => Self::Read { path, source },
            SourceReadError::Binary => Self::Binary { path },
        }
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. }
            | Self::Binary { path }
            | Self::Write { path, .. }
            | Self::Manifest { path, .. } => Some(path),
            Self::Pattern { .. } => None,
        }
    }
}
