//! Error types and error handling for the indexer.
//!
//! Open, read and task failures are per file or per chunk: the pipeline
//! records them in the run statistics and keeps going. Any other
//! variant returned from the pipeline ends the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::ByteRange;

/// Result type alias for indexer operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Main error type for the indexer
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("No input files supplied")]
    NoInputFiles,

    #[error("Could not open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Read failed for {path} in {range}: {source}")]
    ReadFailed {
        path: String,
        range: ByteRange,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write output file {path:?}: {source}")]
    OutputFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Indexing cancelled")]
    Cancelled,

    #[error("Worker task failed: {0}")]
    TaskFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}
