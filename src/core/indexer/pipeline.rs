//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end run:
//! 1. Deduplicate the document list
//! 2. Open each document and plan its byte ranges
//! 3. Dispatch one tokenization task per range
//! 4. Fold partial indexes in the reducer
//! 5. Write the sorted index artifact

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::core::config::IndexingConfig;
use crate::core::error::{IndexError, Result};
use crate::core::indexer::dispatcher::{CancelToken, ChunkTask, Dispatcher};
use crate::core::indexer::merger::Merger;
use crate::core::indexer::planner::ChunkPlanner;
use crate::core::indexer::source::FileSource;
use crate::core::indexer::writer::write_index_file;
use crate::core::types::{DocId, GlobalIndex, IndexStats};

/// Orchestrates the indexing pipeline
#[derive(Debug, Clone)]
pub struct IndexingPipeline {
    planner: ChunkPlanner,
    dispatcher: Dispatcher,
    progress_interval: usize,
}

/// Planning result for the whole document list.
#[derive(Debug, Default)]
struct Plan {
    units: Vec<ChunkTask>,
    files_indexed: usize,
    files_skipped: usize,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any size or count in `config` is zero.
    pub fn new(config: &IndexingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(IndexError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }
        if config.workers == 0 {
            return Err(IndexError::ConfigError(
                "Worker count must be non-zero".to_string(),
            ));
        }
        if config.read_buffer_size == 0 {
            return Err(IndexError::ConfigError(
                "Read buffer size must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            planner: ChunkPlanner::new(config.chunk_size),
            dispatcher: Dispatcher::new(config.workers, config.read_buffer_size),
            progress_interval: config.progress_interval.max(1),
        })
    }

    /// Build the global index for `files`.
    ///
    /// Paths are taken as OS strings and need not be valid UTF-8. Files
    /// that cannot be opened are logged and skipped; chunks that cannot
    /// be fully read contribute what was read. Both are reported in the
    /// returned statistics.
    ///
    /// # Errors
    ///
    /// - `NoInputFiles` if `files` is empty
    /// - `Cancelled` if `cancel` fired; in-flight chunks are drained
    ///   first so the reducer never sees a torn partial index
    /// - `Internal` if the planner or reducer task died
    pub async fn build_index<P: AsRef<Path>>(
        &self,
        files: &[P],
        cancel: &CancelToken,
    ) -> Result<(GlobalIndex, IndexStats)> {
        if files.is_empty() {
            return Err(IndexError::NoInputFiles);
        }

        let start = Instant::now();
        let docs = dedup_documents(files);
        let files_requested = docs.len();

        // Step 1: Plan ranges
        tracing::info!(
            "Planning {} files in chunks of {} bytes",
            files_requested,
            self.planner.chunk_size()
        );
        let planner = self.planner;
        let plan_cancel = cancel.clone();
        let plan = tokio::task::spawn_blocking(move || plan_documents(planner, docs, &plan_cancel))
            .await
            .map_err(|e| IndexError::Internal(format!("planner task failed: {e}")))?;

        tracing::info!(
            "Planned {} chunks across {} files ({} skipped)",
            plan.units.len(),
            plan.files_indexed,
            plan.files_skipped
        );

        // Step 2: Tokenize and merge
        let chunks_planned = plan.units.len();
        let (tx, rx) = mpsc::channel(self.dispatcher.workers());
        let reducer = Merger::spawn(rx, self.progress_interval);
        let dispatch = self.dispatcher.dispatch(plan.units, tx, cancel).await;
        let merged = reducer
            .await
            .map_err(|e| IndexError::Internal(format!("reducer task failed: {e}")))?;

        if dispatch.cancelled || cancel.is_cancelled() {
            tracing::warn!(
                "Run cancelled after merging {} of {} chunks",
                merged.merged,
                chunks_planned
            );
            return Err(IndexError::Cancelled);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexing complete: {} files indexed, {} skipped, {} chunks, \
             {} distinct tokens in {}ms",
            plan.files_indexed,
            plan.files_skipped,
            dispatch.chunks_processed,
            merged.index.len(),
            duration_ms
        );

        let stats = IndexStats {
            files_requested,
            files_indexed: plan.files_indexed,
            files_skipped: plan.files_skipped,
            chunks_planned,
            chunks_processed: dispatch.chunks_processed,
            chunk_failures: dispatch.failures,
            bytes_read: dispatch.bytes_read,
            distinct_tokens: merged.index.len(),
            duration_ms,
        };

        Ok((merged.index, stats))
    }

    /// Build the index for `files` and write it to `output`.
    ///
    /// The output file is replaced only after the index is complete, so
    /// a cancelled run leaves any previous artifact untouched.
    pub async fn run<P: AsRef<Path>>(
        &self,
        files: &[P],
        output: &Path,
        cancel: &CancelToken,
    ) -> Result<IndexStats> {
        let start = Instant::now();
        let (index, mut stats) = self.build_index(files, cancel).await?;

        // Step 3: Write artifact
        tracing::info!("Writing index to {:?}", output);
        let path = output.to_path_buf();
        tokio::task::spawn_blocking(move || write_index_file(&index, &path))
            .await
            .map_err(|e| IndexError::Internal(format!("writer task failed: {e}")))??;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("Total time: {:.3}s", stats.duration_ms as f64 / 1000.0);

        Ok(stats)
    }
}

/// Drop repeated paths, keeping the first occurrence.
fn dedup_documents<P: AsRef<Path>>(files: &[P]) -> Vec<DocId> {
    let mut seen = HashSet::new();
    let mut docs = Vec::with_capacity(files.len());
    for file in files {
        let path = file.as_ref();
        if seen.insert(path.as_os_str()) {
            docs.push(DocId::from(path));
        } else {
            tracing::debug!("Ignoring duplicate input {}", path.display());
        }
    }
    docs
}

/// Open every document and plan its ranges.
///
/// The planning handle is closed before any chunk task opens its own.
fn plan_documents(planner: ChunkPlanner, docs: Vec<DocId>, cancel: &CancelToken) -> Plan {
    let mut plan = Plan::default();

    for doc in docs {
        if cancel.is_cancelled() {
            break;
        }

        let mut src = match FileSource::open(doc.as_path()) {
            Ok(src) => src,
            Err(source) => {
                let err = IndexError::OpenFailed {
                    path: doc.to_string(),
                    source,
                };
                tracing::warn!("Skipping file: {}", err);
                plan.files_skipped += 1;
                continue;
            }
        };

        match planner.plan(&mut src) {
            Ok(ranges) => {
                tracing::debug!("Planned {} ({} chunks)", doc, ranges.len());
                plan.files_indexed += 1;
                plan.units.extend(ranges.into_iter().map(|range| ChunkTask {
                    doc: doc.clone(),
                    range,
                }));
            }
            Err(source) => {
                let err = IndexError::OpenFailed {
                    path: doc.to_string(),
                    source,
                };
                tracing::warn!("Skipping file: {}", err);
                plan.files_skipped += 1;
            }
        }
    }

    plan
}
