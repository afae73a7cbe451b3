//! CLI adapter for invidx
//!
//! Parses arguments, layers them over the loaded configuration and
//! drives one indexing run. All domain logic lives in `core/`.

pub mod index;
pub mod output;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::core::config::Config;
use crate::core::error::{IndexError, Result};
use crate::core::indexer::CancelToken;

/// invidx - parallel inverted index builder
///
/// Reads every FILE, splits it into word-safe chunks indexed in
/// parallel, and writes one `token<TAB>files...` line per distinct
/// token, sorted by token.
#[derive(Parser, Debug)]
#[command(name = "invidx")]
#[command(version)]
#[command(about = "Build an inverted index from text files", long_about = None)]
pub struct Cli {
    /// Files to index (each path is used verbatim as the document name)
    pub files: Vec<PathBuf>,

    /// Output file [default: indice_final.txt]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Target chunk size in bytes [default: 4194304]
    #[arg(long, short = 'c')]
    pub chunk_size: Option<u64>,

    /// Maximum parallel chunk tasks [default: number of CPUs]
    #[arg(long, short = 'j')]
    pub workers: Option<usize>,

    /// TOML configuration file
    #[arg(long, env = "INVIDX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Summary format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Log format for the status stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Plain text lines (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Effective configuration: file/env/defaults, then CLI flags.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.indexing.chunk_size = chunk_size;
        }
        if let Some(workers) = self.workers {
            config.indexing.workers = workers;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<()> {
    if cli.files.is_empty() {
        let usage = Cli::command().render_usage();
        eprintln!("{usage}");
        return Err(IndexError::NoInputFiles);
    }

    let config = cli.resolve_config()?;
    config.log_config();

    let cancel = CancelToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());

    let result = index::execute(&cli.files, &config, cli.format, &cancel).await;
    watcher.abort();

    result.map(|_| ())
}

/// Cancel the run on Ctrl-C.
fn spawn_interrupt_watcher(cancel: CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight chunks");
            cancel.cancel();
        }
    })
}
