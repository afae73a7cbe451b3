//! Chunk tokenization.
//!
//! Scans one planned byte range of one document and produces the
//! range's partial index. The range is read in fixed-size blocks and a
//! word that spans two blocks is carried over, so memory per task is
//! bounded by the block size plus the partial index itself.

use std::io;

use crate::core::error::IndexError;
use crate::core::indexer::normalize::{is_token_byte, normalize};
use crate::core::indexer::source::ByteSource;
use crate::core::types::{ByteRange, DocId, PartialIndex};

/// Result of tokenizing one range.
///
/// A failed read still carries whatever was indexed before the
/// failure; the caller decides how to report it.
#[derive(Debug)]
pub struct ChunkOutcome {
    pub index: PartialIndex,
    pub bytes_read: u64,
    pub failure: Option<IndexError>,
}

/// Tokenizes byte ranges into partial indexes.
#[derive(Debug, Clone, Copy)]
pub struct ChunkTokenizer {
    buffer_size: usize,
}

impl ChunkTokenizer {
    /// Create a tokenizer reading `buffer_size` bytes per call.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_size` is 0.
    pub fn new(buffer_size: usize) -> Self {
        assert!(buffer_size > 0, "buffer_size must be > 0");
        Self { buffer_size }
    }

    /// Index every token inside `range` of `src` under `doc`.
    ///
    /// A short read (the source ran out before `range.end`) keeps all
    /// tokens seen, including a word cut off by the end of data. A read
    /// error keeps completed tokens and drops the run in progress.
    pub fn tokenize<S: ByteSource + ?Sized>(
        &self,
        doc: &DocId,
        src: &mut S,
        range: ByteRange,
    ) -> ChunkOutcome {
        let mut index = PartialIndex::new();
        let mut word: Vec<u8> = Vec::new();
        let mut bytes_read = 0u64;
        let mut failure = None;

        let block = (range.len().min(self.buffer_size as u64) as usize).max(1);
        let mut buf = vec![0u8; block];
        let mut pos = range.start;

        while pos < range.end {
            let want = ((range.end - pos) as usize).min(block);
            match src.read_at(pos, &mut buf[..want]) {
                Ok(0) => {
                    failure = Some(IndexError::ReadFailed {
                        path: doc.to_string(),
                        range,
                        source: io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("data ended at byte {pos}"),
                        ),
                    });
                    break;
                }
                Ok(n) => {
                    scan_block(&buf[..n], &mut word, &mut index, doc);
                    pos += n as u64;
                    bytes_read += n as u64;
                }
                Err(e) => {
                    word.clear();
                    failure = Some(IndexError::ReadFailed {
                        path: doc.to_string(),
                        range,
                        source: e,
                    });
                    break;
                }
            }
        }

        flush_word(&mut word, &mut index, doc);

        ChunkOutcome {
            index,
            bytes_read,
            failure,
        }
    }
}

fn scan_block(block: &[u8], word: &mut Vec<u8>, index: &mut PartialIndex, doc: &DocId) {
    for &byte in block {
        if is_token_byte(byte) {
            word.push(byte);
        } else if !word.is_empty() {
            flush_word(word, index, doc);
        }
    }
}

fn flush_word(word: &mut Vec<u8>, index: &mut PartialIndex, doc: &DocId) {
    if word.is_empty() {
        return;
    }
    if let Some(token) = normalize(word) {
        index.insert(&token, doc);
    }
    word.clear();
}
