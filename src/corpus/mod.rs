//! Corpus preparation utilities
//!
//! One-off tooling for slicing a monolithic corpus export into the
//! per-document files the extraction pipeline consumes.

pub mod splitter;

pub use splitter::{split_corpus, SplitReport, SplitterConfig};
