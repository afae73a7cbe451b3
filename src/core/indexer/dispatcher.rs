//! Parallel chunk dispatch.
//!
//! Runs one blocking task per `(document, range)` unit on a pool
//! bounded by a semaphore. A task holds its permit until its partial
//! index is queued on the reducer channel. With a channel of capacity
//! `workers`, at most about `2 * workers` partial indexes (plus the one
//! being merged) exist outside the global index at any time. Excess
//! units wait for a permit in submission order.
//!
//! Each task opens its own read handle on the document. Per-task
//! failures (open, read, panic) are recorded and never abort sibling
//! tasks.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::core::error::IndexError;
use crate::core::indexer::source::FileSource;
use crate::core::indexer::tokenizer::{ChunkOutcome, ChunkTokenizer};
use crate::core::types::{ByteRange, ChunkFailure, DocId, PartialIndex};

/// Run-level cancellation flag shared by the producer and all tasks.
///
/// Cancelling stops new units from being scheduled; tasks already
/// running finish and hand in their partial index, so the reducer
/// always sees complete partials.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One unit of tokenization work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTask {
    pub doc: DocId,
    pub range: ByteRange,
}

/// Per-unit outcome returned to the dispatcher.
#[derive(Debug)]
struct ChunkReport {
    bytes_read: u64,
    delivered: bool,
    failure: Option<ChunkFailure>,
}

/// Aggregate result of a dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Units whose partial index reached the reducer
    pub chunks_processed: usize,
    pub bytes_read: u64,
    pub failures: Vec<ChunkFailure>,
    /// Set when cancellation stopped scheduling before every unit ran
    pub cancelled: bool,
}

/// Schedules chunk tasks on a bounded worker pool.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tokenizer: ChunkTokenizer,
    workers: usize,
}

impl Dispatcher {
    /// Create a dispatcher running at most `workers` tasks at once.
    ///
    /// # Panics
    ///
    /// Panics if `workers` or `read_buffer_size` is 0.
    pub fn new(workers: usize, read_buffer_size: usize) -> Self {
        assert!(workers > 0, "workers must be > 0");
        Self {
            tokenizer: ChunkTokenizer::new(read_buffer_size),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every unit and send each partial index to `sink`.
    ///
    /// Returns once all scheduled tasks have finished. `sink` is
    /// dropped on return, which lets the reducer complete.
    pub async fn dispatch(
        &self,
        units: Vec<ChunkTask>,
        sink: mpsc::Sender<PartialIndex>,
        cancel: &CancelToken,
    ) -> DispatchReport {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks: JoinSet<ChunkReport> = JoinSet::new();
        let mut report = DispatchReport::default();
        let total = units.len();

        for (scheduled, unit) in units.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    "Cancellation requested, {} of {} chunks not scheduled",
                    total - scheduled,
                    total
                );
                report.cancelled = true;
                break;
            }

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            while let Some(done) = tasks.try_join_next() {
                record(&mut report, done);
            }

            let tokenizer = self.tokenizer;
            let sink = sink.clone();
            let cancel = cancel.clone();
            tasks.spawn_blocking(move || {
                let _permit = permit;
                run_unit(tokenizer, unit, &sink, &cancel)
            });
        }

        drop(sink);

        while let Some(done) = tasks.join_next().await {
            record(&mut report, done);
        }

        if cancel.is_cancelled() {
            report.cancelled = true;
        }

        report
    }
}

fn record(report: &mut DispatchReport, done: Result<ChunkReport, tokio::task::JoinError>) {
    match done {
        Ok(chunk) => {
            report.bytes_read += chunk.bytes_read;
            if chunk.delivered {
                report.chunks_processed += 1;
            }
            if let Some(failure) = chunk.failure {
                report.failures.push(failure);
            }
        }
        Err(e) => {
            tracing::error!("Chunk task did not complete: {}", e);
        }
    }
}

/// Body of one blocking task.
fn run_unit(
    tokenizer: ChunkTokenizer,
    unit: ChunkTask,
    sink: &mpsc::Sender<PartialIndex>,
    cancel: &CancelToken,
) -> ChunkReport {
    let ChunkTask { doc, range } = unit;

    if cancel.is_cancelled() {
        return ChunkReport {
            bytes_read: 0,
            delivered: false,
            failure: Some(failure_for(&doc, range, &IndexError::Cancelled)),
        };
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| tokenize_unit(tokenizer, &doc, range)))
        .unwrap_or_else(|payload| ChunkOutcome {
            index: PartialIndex::new(),
            bytes_read: 0,
            failure: Some(IndexError::TaskFailed(panic_message(payload.as_ref()))),
        });

    let failure = outcome.failure.as_ref().map(|e| {
        tracing::warn!("Chunk {} of {} indexed partially: {}", range, doc, e);
        failure_for(&doc, range, e)
    });

    let delivered = match sink.blocking_send(outcome.index) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("Reducer closed before chunk {} of {} was merged", range, doc);
            false
        }
    };

    tracing::debug!("Chunk {} of {} done ({} bytes)", range, doc, outcome.bytes_read);

    ChunkReport {
        bytes_read: outcome.bytes_read,
        delivered,
        failure,
    }
}

fn tokenize_unit(tokenizer: ChunkTokenizer, doc: &DocId, range: ByteRange) -> ChunkOutcome {
    match FileSource::open(doc.as_path()) {
        Ok(mut src) => tokenizer.tokenize(doc, &mut src, range),
        Err(e) => ChunkOutcome {
            index: PartialIndex::new(),
            bytes_read: 0,
            failure: Some(IndexError::ReadFailed {
                path: doc.to_string(),
                range,
                source: e,
            }),
        },
    }
}

fn failure_for(doc: &DocId, range: ByteRange, err: &IndexError) -> ChunkFailure {
    ChunkFailure {
        path: doc.to_string(),
        range,
        reason: err.to_string(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "chunk task panicked".to_string()
    }
}
