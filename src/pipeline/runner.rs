//! Per-file extraction drivers
//!
//! [`CorpusPipeline`] wires the tokenizer, graph builder, extractor, and
//! metrics calculator together and drives them over a list of input files.
//! A failure on one file is logged and never aborts the remaining files;
//! only output-side errors are fatal. Files can be processed in parallel,
//! but records are always written in original input order so the CSV output
//! is identical to a sequential run.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::error::{ExtractError, Result};
use crate::graph::DependencyGraph;
use crate::metrics::{ShortSequencePolicy, SurprisalCalculator};
use crate::phrase::{ExtractionPolicy, NounPhrase, NpExtractor};
use crate::pipeline::records::{DocumentRecord, NpRecord, SentenceRecord, VocabRecord};
use crate::pipeline::sink::CsvSink;
use crate::types::Token;
use crate::vrt::tokenizer::{ParsedDocument, SentenceTokenizer, TokenizerConfig};

/// Configuration for a [`CorpusPipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub tokenizer: TokenizerConfig,
    pub policy: ExtractionPolicy,
    pub short_sequence: ShortSequencePolicy,
    /// Process input files on the rayon pool. Output order is unaffected.
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_short_sequence_policy(mut self, policy: ShortSequencePolicy) -> Self {
        self.short_sequence = policy;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Counters reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub records_written: usize,
    pub files_failed: usize,
}

/// Document-level extraction result for one file.
#[derive(Debug, Clone, Default)]
pub struct DocumentSummary {
    /// One record per file; `None` when the file held no tokens.
    pub record: Option<DocumentRecord>,
    pub year: Option<String>,
    pub lemmas: FxHashSet<String>,
}

/// Per-year lemma vocabulary, accumulated across files.
///
/// Owned by the driver and updated only after a file completes, so no
/// partial-file state is ever visible.
#[derive(Debug, Clone, Default)]
pub struct VocabAccumulator {
    per_year: FxHashMap<String, FxHashSet<String>>,
}

impl VocabAccumulator {
    /// Merge one completed file's lemmas under its year.
    pub fn absorb(&mut self, year: Option<&str>, lemmas: FxHashSet<String>) {
        let year = year.unwrap_or("unknown").to_string();
        self.per_year.entry(year).or_default().extend(lemmas);
    }

    /// Vocabulary sizes per year, sorted by year ascending.
    pub fn year_counts(&self) -> Vec<VocabRecord> {
        let mut counts: Vec<VocabRecord> = self
            .per_year
            .iter()
            .map(|(year, lemmas)| VocabRecord {
                year: year.clone(),
                vocab_size: lemmas.len(),
            })
            .collect();
        counts.sort_by(|a, b| a.year.cmp(&b.year));
        counts
    }

    /// Overwrite `path` with the `year,vocab_size` table.
    pub fn write_sidecar(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        let counts = self.year_counts();
        if counts.is_empty() {
            writer.write_record(["year", "vocab_size"])?;
        }
        for record in counts {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| ExtractError::io(path.as_ref(), e))
    }
}

/// Sidecar path for the vocabulary table: `out.csv` -> `out_vocab_per_year.csv`.
pub fn vocab_sidecar_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{stem}_vocab_per_year.csv"))
}

/// The assembled extraction pipeline.
#[derive(Debug, Clone)]
pub struct CorpusPipeline {
    tokenizer: SentenceTokenizer,
    extractor: NpExtractor,
    calculator: SurprisalCalculator,
    parallel: bool,
}

impl CorpusPipeline {
    /// Build the pipeline, compiling the configured tag patterns.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let calculator =
            SurprisalCalculator::new().with_short_sequence_policy(config.short_sequence);
        Ok(Self {
            tokenizer: SentenceTokenizer::new(config.tokenizer)?,
            extractor: NpExtractor::new(config.policy).with_calculator(calculator),
            calculator,
            parallel: config.parallel,
        })
    }

    /// Tokenize one document's content.
    pub fn parse(&self, content: &str) -> ParsedDocument {
        self.tokenizer.tokenize(content)
    }

    /// Extract all valid NPs from one document's content.
    pub fn noun_phrases(&self, content: &str) -> Vec<NounPhrase> {
        let doc = self.parse(content);
        let mut phrases = Vec::new();
        for sentence in &doc.sentences {
            let graph = DependencyGraph::from_sentence(sentence);
            phrases.extend(self.extractor.extract(sentence, &graph, &doc.metadata));
        }
        phrases
    }

    /// One record per sentence of one document's content.
    pub fn sentence_records(&self, content: &str) -> Vec<SentenceRecord> {
        let doc = self.parse(content);
        doc.sentences
            .iter()
            .filter_map(|sentence| {
                let metrics = self.calculator.compute(&sentence.surprisals())?;
                Some(SentenceRecord::new(sentence, &doc.metadata, &metrics))
            })
            .collect()
    }

    /// Document-level record plus the file's year and lemma set.
    pub fn document_summary(&self, content: &str) -> DocumentSummary {
        let doc = self.parse(content);
        let tokens: Vec<&Token> = doc.sentences.iter().flat_map(|s| &s.tokens).collect();
        let lemmas: FxHashSet<String> = tokens.iter().map(|t| t.lemma.clone()).collect();
        let surprisals: Vec<f64> = tokens.iter().map(|t| t.surprisal).collect();

        let record = self
            .calculator
            .compute(&surprisals)
            .map(|metrics| DocumentRecord::new(&doc.metadata, tokens.len(), &metrics));

        DocumentSummary {
            record,
            year: doc.metadata.year.clone(),
            lemmas,
        }
    }

    /// Extract NPs from every input and append them to `sink`.
    ///
    /// `on_file` runs after each successfully processed file with the number
    /// of records it contributed.
    pub fn run_noun_phrases(
        &self,
        inputs: &[PathBuf],
        sink: &mut CsvSink,
        mut on_file: impl FnMut(&Path, usize),
    ) -> Result<RunSummary> {
        let extracted = self.map_files(inputs, |content| {
            self.noun_phrases(content)
                .iter()
                .map(NpRecord::from_phrase)
                .collect::<Vec<_>>()
        });
        let mut summary = RunSummary::default();
        for (path, result) in inputs.iter().zip(extracted) {
            match result {
                Ok(records) => {
                    for record in &records {
                        sink.write(record)?;
                    }
                    summary.files_processed += 1;
                    summary.records_written += records.len();
                    on_file(path, records.len());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    summary.files_failed += 1;
                }
            }
        }
        sink.flush()?;
        Ok(summary)
    }

    /// Extract sentence records from every input and append them to `sink`.
    pub fn run_sentences(
        &self,
        inputs: &[PathBuf],
        sink: &mut CsvSink,
        mut on_file: impl FnMut(&Path, usize),
    ) -> Result<RunSummary> {
        let extracted = self.map_files(inputs, |content| self.sentence_records(content));
        let mut summary = RunSummary::default();
        for (path, result) in inputs.iter().zip(extracted) {
            match result {
                Ok(records) => {
                    for record in &records {
                        sink.write(record)?;
                    }
                    summary.files_processed += 1;
                    summary.records_written += records.len();
                    on_file(path, records.len());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    summary.files_failed += 1;
                }
            }
        }
        sink.flush()?;
        Ok(summary)
    }

    /// Extract document records, feeding the vocabulary accumulator.
    ///
    /// The accumulator sees each file only after it fully completed, in
    /// input order.
    pub fn run_documents(
        &self,
        inputs: &[PathBuf],
        sink: &mut CsvSink,
        vocab: &mut VocabAccumulator,
        mut on_file: impl FnMut(&Path, usize),
    ) -> Result<RunSummary> {
        let extracted = self.map_files(inputs, |content| self.document_summary(content));
        let mut summary = RunSummary::default();
        for (path, result) in inputs.iter().zip(extracted) {
            match result {
                Ok(doc) => {
                    let mut written = 0;
                    if let Some(record) = &doc.record {
                        sink.write(record)?;
                        written = 1;
                    }
                    vocab.absorb(doc.year.as_deref(), doc.lemmas);
                    summary.files_processed += 1;
                    summary.records_written += written;
                    on_file(path, written);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    summary.files_failed += 1;
                }
            }
        }
        sink.flush()?;
        Ok(summary)
    }

    /// Read and transform each input, optionally on the rayon pool.
    ///
    /// Results come back in input order either way.
    fn map_files<T, F>(&self, inputs: &[PathBuf], extract: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&str) -> T + Sync,
    {
        let one = |path: &PathBuf| -> Result<T> {
            let content =
                std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
            Ok(extract(&content))
        };
        if self.parallel {
            inputs.par_iter().map(one).collect()
        } else {
            inputs.iter().map(one).collect()
        }
    }
}
