//! invidx - parallel inverted index builder
//!
//! Builds a mapping from normalized word to the set of files that
//! contain it, and writes it as a sorted text file.
//!
//! # Architecture
//!
//! - **core**: Domain logic (interface-agnostic)
//!   - config, error, types
//!   - indexer (planning, tokenization, dispatch, merge, output)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Properties
//!
//! - Files are split into byte ranges whose boundaries never cut a word
//! - Ranges are tokenized in parallel on a bounded worker pool
//! - A single reducer owns the global index, so merging is race-free
//! - Output is sorted by token, documents sorted per token, so runs
//!   over the same files are byte-identical

// Core domain logic
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{IndexError, Result};
pub use crate::core::indexer::{CancelToken, IndexingPipeline};
pub use crate::core::types::*;
