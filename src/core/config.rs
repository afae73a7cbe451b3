//! Configuration management for the indexer.
//!
//! Every setting has a default, so a run with no config file and no
//! environment overrides behaves like the plain `invidx FILE...`
//! invocation. An optional TOML file and `INVIDX_*` environment
//! variables can adjust the defaults; CLI flags win over both.

use crate::core::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Target chunk size in bytes (before boundary adjustment)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Maximum number of chunk tasks in flight
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bytes read per call inside a chunk task
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Log progress every N merged chunks
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Path of the index artifact
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

// Default value functions
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;
pub const DEFAULT_OUTPUT_FILE: &str = "indice_final.txt";

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_read_buffer_size() -> usize {
    64 * 1024
}

fn default_progress_interval() -> usize {
    64
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            workers: default_workers(),
            read_buffer_size: default_read_buffer_size(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            IndexError::ConfigError(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// Without a config file the defaults are used as the base layer.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unparseable values are ignored and the previous value is kept.
    pub fn merge_env(&mut self) {
        if let Ok(chunk_size) = env::var("INVIDX_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.trim().parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(workers) = env::var("INVIDX_WORKERS") {
            if let Ok(n) = workers.trim().parse() {
                self.indexing.workers = n;
            }
        }
        if let Ok(output) = env::var("INVIDX_OUTPUT") {
            if !output.trim().is_empty() {
                self.output.path = PathBuf::from(output);
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(IndexError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.workers == 0 {
            return Err(IndexError::ConfigError(
                "Worker count must be non-zero".to_string(),
            ));
        }

        if self.indexing.read_buffer_size == 0 {
            return Err(IndexError::ConfigError(
                "Read buffer size must be non-zero".to_string(),
            ));
        }

        if self.indexing.progress_interval == 0 {
            return Err(IndexError::ConfigError(
                "Progress interval must be non-zero".to_string(),
            ));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(IndexError::ConfigError(
                "Output path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} bytes", self.indexing.chunk_size);
        tracing::info!("  Workers: {}", self.indexing.workers);
        tracing::info!("  Read buffer: {} bytes", self.indexing.read_buffer_size);
        tracing::info!("  Output: {:?}", self.output.path);
    }
}
