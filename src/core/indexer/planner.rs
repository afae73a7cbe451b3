//! Word-boundary-safe chunk planning.
//!
//! Splits a file into byte ranges of roughly `chunk_size` bytes that
//! can be tokenized independently. Naive boundaries sit at multiples
//! of `chunk_size`; every internal boundary is then moved forward past
//! any token bytes it lands on, so a word that starts before the
//! boundary ends in the same chunk.
//!
//! Guarantees for `len > 0`:
//!
//! - ranges are non-empty, contiguous and ordered
//! - the first range starts at 0, the last ends at `len`
//! - no internal boundary has a token byte on both sides
//!
//! # Example
//!
//! ```
//! use invidx::core::indexer::ChunkPlanner;
//!
//! let planner = ChunkPlanner::new(4);
//! let ranges = planner.plan_slice(b"hello big world");
//!
//! // "hello" absorbs the naive boundary at 4
//! assert_eq!(ranges[0].end, 5);
//! assert_eq!(ranges.last().unwrap().end, 15);
//! ```

use std::convert::Infallible;
use std::io;

use crate::core::indexer::normalize::is_token_byte;
use crate::core::indexer::source::{ByteSource, SliceSource};
use crate::core::types::ByteRange;

/// Bytes fetched per read while scanning past a boundary.
const SCAN_BLOCK: usize = 256;

/// Plans the byte ranges of a single file.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    /// Target chunk size in bytes
    chunk_size: u64,
}

impl ChunkPlanner {
    /// Create a new planner.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0.
    pub fn new(chunk_size: u64) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Plan ranges for a source, reading only the bytes around each
    /// internal boundary.
    pub fn plan<S: ByteSource + ?Sized>(&self, src: &mut S) -> io::Result<Vec<ByteRange>> {
        let len = src.len();
        self.plan_with(len, |b| adjust_boundary(src, b))
    }

    /// Plan ranges for an in-memory buffer.
    pub fn plan_slice(&self, data: &[u8]) -> Vec<ByteRange> {
        let len = data.len() as u64;
        match self.plan_with::<Infallible>(len, |b| Ok(snap_boundary(data, b as usize) as u64)) {
            Ok(ranges) => ranges,
            Err(never) => match never {},
        }
    }

    /// Core planning loop, parameterized over the boundary snapper.
    fn plan_with<E>(
        &self,
        len: u64,
        mut snap: impl FnMut(u64) -> Result<u64, E>,
    ) -> Result<Vec<ByteRange>, E> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut ranges = Vec::with_capacity((len / self.chunk_size) as usize + 1);
        let mut start = 0u64;
        let mut naive = self.chunk_size;

        while naive < len {
            // A long word may already have carried the previous
            // boundary past this one
            if naive > start {
                let end = snap(naive)?.min(len);
                if end >= len {
                    break;
                }
                ranges.push(ByteRange::new(start, end));
                start = end;
            }
            naive = naive.saturating_add(self.chunk_size);
        }

        ranges.push(ByteRange::new(start, len));
        Ok(ranges)
    }
}

/// Move boundary `b` forward to the first non-token byte at or after
/// it (or to the end of `data`).
///
/// Pure; the planner's in-memory counterpart of [`adjust_boundary`].
pub fn snap_boundary(data: &[u8], b: usize) -> usize {
    let mut pos = b.min(data.len());
    while pos < data.len() && is_token_byte(data[pos]) {
        pos += 1;
    }
    pos
}

/// Move boundary `b` forward to the first non-token byte at or after
/// it, reading from `src`.
///
/// Stops at `src.len()`, or earlier if the source returns no more data.
pub fn adjust_boundary<S: ByteSource + ?Sized>(src: &mut S, b: u64) -> io::Result<u64> {
    let len = src.len();
    let mut pos = b.min(len);
    let mut buf = [0u8; SCAN_BLOCK];

    while pos < len {
        let want = ((len - pos) as usize).min(SCAN_BLOCK);
        let n = src.read_at(pos, &mut buf[..want])?;
        if n == 0 {
            break;
        }
        match buf[..n].iter().position(|byte| !is_token_byte(*byte)) {
            Some(i) => return Ok(pos + i as u64),
            None => pos += n as u64,
        }
    }

    Ok(pos)
}
