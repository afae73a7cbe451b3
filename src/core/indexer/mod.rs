//! Inverted index construction.
//!
//! The pipeline runs leaf components in this order:
//!
//! - **planner**: split each file into word-boundary-safe byte ranges
//! - **tokenizer**: turn one range into a partial index
//! - **dispatcher**: run range tasks on a bounded worker pool
//! - **merger**: fold partial indexes into the global index
//! - **writer**: serialize the global index as sorted text
//!
//! Tokens are ASCII alphanumeric runs, lowercased.
//! Non-ASCII bytes always separate tokens, which is what lets the
//! planner cut a file at any non-token byte without decoding it.

pub mod dispatcher;
pub mod merger;
pub mod normalize;
pub mod pipeline;
pub mod planner;
pub mod source;
pub mod tokenizer;
pub mod writer;

pub use dispatcher::{CancelToken, ChunkTask, DispatchReport, Dispatcher};
pub use merger::{MergeReport, Merger};
pub use normalize::{is_token_byte, normalize, tokens};
pub use pipeline::IndexingPipeline;
pub use planner::{adjust_boundary, snap_boundary, ChunkPlanner};
pub use source::{ByteSource, FileSource, SliceSource};
pub use tokenizer::{ChunkOutcome, ChunkTokenizer};
pub use writer::{write_index, write_index_file};
