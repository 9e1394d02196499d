//! Extraction pipeline
//!
//! Per-file drivers that wire tokenizer, graph builder, NP extractor, and
//! metrics together, plus the flat CSV record types and the append-only sink
//! they are written to.

pub mod records;
pub mod runner;
pub mod sink;

pub use records::{DocumentRecord, NpRecord, SentenceRecord};
pub use runner::{CorpusPipeline, PipelineConfig, RunSummary, VocabAccumulator};
pub use sink::CsvSink;
