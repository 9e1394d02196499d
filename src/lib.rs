//! Noun phrase and surprisal-metric extraction from VRT corpora
//!
//! This crate reads dependency-annotated, tag-delimited vertical text (one
//! token per line, tab-separated annotation columns), reconstructs each
//! sentence's dependency graph, extracts noun phrases under one of three
//! policies, and computes surprisal-based information-theoretic metrics
//! (UID deviation and information fluctuation complexity) over NPs,
//! sentences, and whole documents.
//!
//! # Pipeline
//!
//! 1. [`vrt`] turns raw lines into document metadata and token sequences
//! 2. [`graph`] rebuilds head-to-dependents structure per sentence
//! 3. [`phrase`] selects NP heads and assembles their token sets
//! 4. [`metrics`] computes the surprisal statistics
//! 5. [`pipeline`] drives files end to end and writes CSV rows

pub mod corpus;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod phrase;
pub mod pipeline;
pub mod types;
pub mod vrt;

pub use error::{ExtractError, Result};
pub use graph::DependencyGraph;
pub use metrics::{
    quadratic_mean_transitions, ShortSequencePolicy, SurprisalCalculator, SurprisalMetrics,
};
pub use phrase::{ExtractionPolicy, NounPhrase, NpExtractor};
pub use pipeline::{CorpusPipeline, CsvSink, PipelineConfig, RunSummary};
pub use types::{ColumnLayout, DocumentMetadata, Sentence, SurprisalColumn, Token};
pub use vrt::{MetadataExtractor, SentenceTokenizer, TokenizerConfig};
