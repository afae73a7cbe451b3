//! Partial index merging.
//!
//! During a run the global index has exactly one writer: the reducer
//! started by [`Merger::spawn`]. Merging is CPU-bound, so the reducer
//! runs on the blocking pool like the chunk tasks do. Chunk tasks hand their partial
//! indexes over a bounded channel and never touch the global index
//! themselves. Union is commutative and associative, so the arrival
//! order of partials does not affect the result.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::types::{GlobalIndex, PartialIndex};

/// What the reducer produced once its channel closed.
#[derive(Debug)]
pub struct MergeReport {
    pub index: GlobalIndex,
    /// Number of partial indexes folded in
    pub merged: usize,
}

/// Folds partial indexes into a global index.
pub struct Merger;

impl Merger {
    /// Start the reducer on the blocking pool.
    ///
    /// The reducer drains `rx` until every sender is dropped, then
    /// returns the finished index. Progress is logged every
    /// `progress_interval` partials.
    pub fn spawn(
        mut rx: mpsc::Receiver<PartialIndex>,
        progress_interval: usize,
    ) -> JoinHandle<MergeReport> {
        let interval = progress_interval.max(1);
        tokio::task::spawn_blocking(move || {
            let mut index = GlobalIndex::new();
            let mut merged = 0usize;

            while let Some(partial) = rx.blocking_recv() {
                index.merge(partial);
                merged += 1;
                if merged % interval == 0 {
                    tracing::info!(
                        "Progress: {} chunks merged, {} distinct tokens",
                        merged,
                        index.len()
                    );
                }
            }

            tracing::debug!("Reducer finished after {} partial indexes", merged);
            MergeReport { index, merged }
        })
    }

    /// Fold partials left to right.
    pub fn reduce(partials: impl IntoIterator<Item = PartialIndex>) -> GlobalIndex {
        partials
            .into_iter()
            .fold(GlobalIndex::new(), |mut acc, partial| {
                acc.merge(partial);
                acc
            })
    }

    /// Merge partials pairwise until one remains.
    ///
    /// Same result as [`Merger::reduce`]; each level halves the number
    /// of indexes, so large partials are merged fewer times.
    pub fn reduce_tree(mut partials: Vec<PartialIndex>) -> GlobalIndex {
        if partials.is_empty() {
            return GlobalIndex::new();
        }
        while partials.len() > 1 {
            let mut next = Vec::with_capacity(partials.len().div_ceil(2));
            let mut iter = partials.into_iter();
            while let Some(mut left) = iter.next() {
                if let Some(right) = iter.next() {
                    left.merge(right);
                }
                next.push(left);
            }
            partials = next;
        }
        partials.pop().unwrap_or_default()
    }
}
