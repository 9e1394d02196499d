//! VRT input handling
//!
//! This module turns raw tag-delimited vertical text into document metadata
//! and per-sentence token sequences.

pub mod metadata;
pub mod tokenizer;

pub use metadata::MetadataExtractor;
pub use tokenizer::{SentenceTokenizer, TokenizerConfig};
