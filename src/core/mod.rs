//! Core domain logic (interface-agnostic)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (defaults, TOML, environment)
//! - **error**: Error types and Result alias
//! - **types**: Byte ranges, inverted indexes and run statistics
//! - **indexer**: Planning, tokenization, dispatch, merge and output

pub mod config;
pub mod error;
pub mod indexer;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{IndexError, Result};
