//! Core data types for the indexer.

use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Document identifier: the file path exactly as given by the caller.
///
/// Paths are kept as OS strings, so names that are not valid UTF-8 are
/// indexed and written back byte for byte. Shared between every posting
/// that references the document, so a token hit costs a refcount bump
/// instead of a path copy. Ordering is byte order of the path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(Arc<OsStr>);

impl DocId {
    pub fn as_path(&self) -> &Path {
        Path::new(&*self.0)
    }

    /// Raw path bytes, as written to the index artifact.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_encoded_bytes()
    }
}

impl<T: AsRef<OsStr> + ?Sized> From<&T> for DocId {
    fn from(path: &T) -> Self {
        Self(Arc::from(path.as_ref()))
    }
}

/// Lossy for paths that are not valid UTF-8.
impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

/// Half-open byte range `[start, end)` over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Create a new range. `end` is clamped so the range is never inverted.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Mapping from normalized token to the set of documents containing it.
///
/// Document sets are ordered by identifier, which is also the order the
/// writer emits them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<DocId>>,
}

/// Index built by a single chunk (or file) task before merging.
pub type PartialIndex = InvertedIndex;

/// Union of every partial index of a run.
pub type GlobalIndex = InvertedIndex;

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `doc` contains `token`.
    pub fn insert(&mut self, token: &str, doc: &DocId) {
        match self.postings.get_mut(token) {
            Some(docs) => {
                if !docs.contains(doc) {
                    docs.insert(doc.clone());
                }
            }
            None => {
                let mut docs = BTreeSet::new();
                docs.insert(doc.clone());
                self.postings.insert(token.to_string(), docs);
            }
        }
    }

    /// Fold `other` into `self`; every token's document set becomes the
    /// union of both sides.
    pub fn merge(&mut self, other: InvertedIndex) {
        if self.postings.is_empty() {
            self.postings = other.postings;
            return;
        }
        for (token, docs) in other.postings {
            match self.postings.get_mut(&token) {
                Some(existing) => existing.extend(docs),
                None => {
                    self.postings.insert(token, docs);
                }
            }
        }
    }

    /// Documents containing `token`, if any.
    pub fn get(&self, token: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(token)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Entries in ascending token order.
    pub fn sorted_entries(&self) -> Vec<(&str, &BTreeSet<DocId>)> {
        let mut entries: Vec<(&str, &BTreeSet<DocId>)> = self
            .postings
            .iter()
            .map(|(token, docs)| (token.as_str(), docs))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Unordered iteration over all postings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<DocId>)> {
        self.postings.iter().map(|(t, d)| (t.as_str(), d))
    }
}

/// A chunk whose contribution is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFailure {
    pub path: String,
    pub range: ByteRange,
    pub reason: String,
}

/// Statistics for one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct documents requested
    pub files_requested: usize,

    /// Documents that were opened and planned
    pub files_indexed: usize,

    /// Documents skipped because they could not be opened
    pub files_skipped: usize,

    /// Byte ranges produced by the planner
    pub chunks_planned: usize,

    /// Byte ranges whose partial index reached the merger
    pub chunks_processed: usize,

    /// Ranges indexed only partially (or not at all)
    pub chunk_failures: Vec<ChunkFailure>,

    /// Bytes read by chunk tasks
    pub bytes_read: u64,

    /// Distinct tokens in the global index
    pub distinct_tokens: usize,

    /// Wall-clock duration of the run
    pub duration_ms: u64,
}
