//! Index command - build and write the inverted index

use std::path::Path;

use serde::Serialize;

use crate::cli::output::{format_bytes, format_elapsed, format_throughput, print_warning, style};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::{CancelToken, IndexingPipeline};
use crate::core::types::{ChunkFailure, IndexStats};

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub output: String,
    pub files_requested: usize,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks_processed: usize,
    pub chunk_failures: Vec<ChunkFailure>,
    pub distinct_tokens: usize,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

impl IndexResponse {
    pub fn new(output: &Path, stats: IndexStats) -> Self {
        Self {
            output: output.display().to_string(),
            files_requested: stats.files_requested,
            files_indexed: stats.files_indexed,
            files_skipped: stats.files_skipped,
            chunks_processed: stats.chunks_processed,
            chunk_failures: stats.chunk_failures,
            distinct_tokens: stats.distinct_tokens,
            bytes_read: stats.bytes_read,
            duration_ms: stats.duration_ms,
        }
    }
}

/// Execute an indexing run over `files`
pub async fn execute<P: AsRef<Path>>(
    files: &[P],
    config: &Config,
    format: OutputFormat,
    cancel: &CancelToken,
) -> Result<IndexResponse> {
    let pipeline = IndexingPipeline::new(&config.indexing)?;
    let output_path = config.output.path.as_path();

    if format == OutputFormat::Human {
        eprintln!(
            "Indexing {} files into {}...",
            style::count(files.len()),
            style::path(output_path.display())
        );
    }

    let stats = pipeline.run(files, output_path, cancel).await?;
    let response = IndexResponse::new(output_path, stats);

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => print_warning(&format!("Could not serialize summary: {e}")),
        },
    }

    Ok(response)
}

fn print_human(response: &IndexResponse) {
    if response.files_skipped > 0 {
        print_warning(&format!(
            "{} of {} files could not be opened and were skipped",
            response.files_skipped, response.files_requested
        ));
    }
    for failure in &response.chunk_failures {
        print_warning(&format!(
            "{} {} indexed partially: {}",
            failure.path, failure.range, failure.reason
        ));
    }

    let rate = format_throughput(response.bytes_read, response.duration_ms)
        .map(|r| format!(", {r}"))
        .unwrap_or_default();
    println!(
        "{} {} files ({} chunks, {}) in {}{}",
        style::done("Indexed"),
        style::count(response.files_indexed),
        style::count(response.chunks_processed),
        style::count(format_bytes(response.bytes_read)),
        style::count(format_elapsed(response.duration_ms)),
        rate
    );
    println!(
        "Wrote {} tokens to {}",
        style::count(response.distinct_tokens),
        style::path(&response.output)
    );
}
