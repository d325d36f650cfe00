use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors produced while loading, joining or writing pileup tables.
#[derive(Debug, Error)]
pub enum PileupError {
    /// Wrong number or shape of inputs.
    #[error("Invalid arguments: {0}")]
    Argument(String),
    /// Input table could not be parsed into the expected layout.
    #[error("Malformed table {path:?}: {reason}")]
    Format { path: PathBuf, reason: String },
    /// Input table lacks a required column.
    #[error("Table {path:?} is missing required column '{column}'")]
    Schema { path: PathBuf, column: String },
    /// Path could not be read or written.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PileupError {
    pub(crate) fn format<P: Into<PathBuf>, S: ToString>(
        path: P,
        reason: S,
    ) -> Self {
        Self::Format {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn schema<P: Into<PathBuf>, S: Into<String>>(
        path: P,
        column: S,
    ) -> Self {
        Self::Schema {
            path:   path.into(),
            column: column.into(),
        }
    }

    pub(crate) fn io<P: Into<PathBuf>>(
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PileupError>;
