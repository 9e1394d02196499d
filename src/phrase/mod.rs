//! Noun phrase extraction
//!
//! This module provides the NP entity with its accumulate-then-freeze
//! lifecycle and the dependency-graph extractor with its three policies.

pub mod entity;
pub mod extractor;

pub use entity::{NounPhrase, NpBuilder};
pub use extractor::{ExtractionPolicy, NpExtractor};
